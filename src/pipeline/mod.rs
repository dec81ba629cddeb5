pub mod builder;
pub mod defaults;
pub mod model_registry;
pub mod runtime;
pub mod traits;
