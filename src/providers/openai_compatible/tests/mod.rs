// Tests for the OpenAI-compatible handler
//
// Unit tests for request building, model-family rules, SSE parsing and stream
// normalization, plus handler flow tests against mocked catalog and transport.


// NOTE: HTTP transport tests are in tests/http_transport_integration_tests.rs
// They use MockServer and are slow, so they don't belong in unit tests
