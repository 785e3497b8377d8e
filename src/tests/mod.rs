// Test modules for multi-llm-stream crate
//
// Each source file under core_types/, protocol/ and the crate root has a
// corresponding test file here that focuses on business logic verification.
// Provider tests live next to the provider in providers/openai_compatible/tests/.

pub mod protocol_lock;
pub mod resolver;
