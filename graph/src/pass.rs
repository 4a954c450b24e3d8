//! Pass instances owned by a render graph.

use crate::value::PassConfig;

/// Opaque handle issued by a [`PassRegistry`](crate::PassRegistry) when it
/// resolves a pass type.
///
/// The graph never interprets the handle; it is carried along so the host can
/// find the executable pass it created for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassHandle(u32);

impl PassHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// A named, configured pass in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PassInstance {
    name: String,
    pass_type: String,
    config: PassConfig,
    handle: PassHandle,
}

impl PassInstance {
    pub(crate) fn new(
        name: String,
        pass_type: String,
        config: PassConfig,
        handle: PassHandle,
    ) -> Self {
        Self {
            name,
            pass_type,
            config,
            handle,
        }
    }

    /// Instance name, unique within the graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pass_type(&self) -> &str {
        &self.pass_type
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    pub fn handle(&self) -> PassHandle {
        self.handle
    }
}
