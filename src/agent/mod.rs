pub mod stateless_llm_factory;
pub mod stateless_llm;

pub use stateless_llm_factory::*;
