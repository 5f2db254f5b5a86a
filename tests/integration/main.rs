//! Integration tests for Crawl-Report

mod crawl_tests;
