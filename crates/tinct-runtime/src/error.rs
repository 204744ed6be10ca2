//! Runtime errors

/// Invariant violations detected while evaluating an element
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// An element gained variables, containers, animations or interaction
    /// handling after its first render
    #[error("element {element} gained the `{capability}` capability after its first render")]
    CapabilityAdded { element: u64, capability: &'static str },
}
