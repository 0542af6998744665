
mod api_tests;
