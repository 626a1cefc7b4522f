mod active_job;
mod registry_key;
mod task_registry;

pub use {active_job::ActiveJob, registry_key::RegistryKey, task_registry::TaskRegistry};
