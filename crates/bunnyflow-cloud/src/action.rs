//! Provisioning steps and their outcomes

use bunnyflow_core::{ResourceIdentity, SyncSummary};

/// One idempotent step of a deployment, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisionStep {
    DnsZone,
    StorageZone,
    Rewrite404,
    PullZone,
    FileSync,
    DnsRecord,
    CustomHostname,
    Ssl,
    CachePurge,
}

impl ProvisionStep {
    pub const ALL: [ProvisionStep; 9] = [
        ProvisionStep::DnsZone,
        ProvisionStep::StorageZone,
        ProvisionStep::Rewrite404,
        ProvisionStep::PullZone,
        ProvisionStep::FileSync,
        ProvisionStep::DnsRecord,
        ProvisionStep::CustomHostname,
        ProvisionStep::Ssl,
        ProvisionStep::CachePurge,
    ];

    /// 1-based position in [`ProvisionStep::ALL`]
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(0, |i| i + 1)
    }
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionStep::DnsZone => write!(f, "dns zone"),
            ProvisionStep::StorageZone => write!(f, "storage zone"),
            ProvisionStep::Rewrite404 => write!(f, "404 rewrite"),
            ProvisionStep::PullZone => write!(f, "pull zone"),
            ProvisionStep::DnsRecord => write!(f, "dns record"),
            ProvisionStep::CustomHostname => write!(f, "custom hostname"),
            ProvisionStep::Ssl => write!(f, "ssl"),
            ProvisionStep::FileSync => write!(f, "file sync"),
            ProvisionStep::CachePurge => write!(f, "cache purge"),
        }
    }
}

/// What a step did to the remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// Created a new resource
    Create,
    /// Changed an existing resource
    Update,
    /// Already in the desired state
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: ProvisionStep,
    pub action: ActionType,
    pub message: String,
}

impl StepOutcome {
    pub fn new(step: ProvisionStep, action: ActionType, message: impl Into<String>) -> Self {
        Self {
            step,
            action,
            message: message.into(),
        }
    }
}

/// The three file stages, run strictly in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Upload,
    Update,
    Delete,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStage::Upload => write!(f, "upload"),
            SyncStage::Update => write!(f, "update"),
            SyncStage::Delete => write!(f, "delete"),
        }
    }
}

/// Everything a finished deployment did
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub identity: ResourceIdentity,
    pub storage_zone: String,
    pub pull_zone_id: i64,
    /// System hostname the CNAME points at
    pub cname_target: String,
    pub steps: Vec<StepOutcome>,
    pub sync: SyncSummary,
    pub duration_ms: u64,
}

impl DeployReport {
    pub fn step(&self, step: ProvisionStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|o| o.step == step)
    }

    /// Number of steps that created a resource
    pub fn created(&self) -> usize {
        self.steps
            .iter()
            .filter(|o| o.action == ActionType::Create)
            .count()
    }
}
