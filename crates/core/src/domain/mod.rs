pub mod procedure;
pub mod workflow_status;
