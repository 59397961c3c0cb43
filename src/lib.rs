//! Token Deployer: sequenced client for a token distribution deployment server
//!
//! Waits for the server to come up, checks it is alive, inspects the currently
//! deployed contract, requests a new deployment and inspects the contract again.
//!
//! # Architecture
//!
//! - **Dispatcher**: one GET per [`EndpointAction`], reduced to an [`Outcome`]
//! - **Sequencer**: runs the steps in a fixed order and reports each outcome
//! - **Config**: server URL, deploy parameters and readiness strategy from the environment
//!
//! # Example
//!
//! ```ignore
//! use token_deployer::{DeployerConfig, Sequencer};
//!
//! let config = DeployerConfig::from_env()?;
//! let mut sequencer = Sequencer::new(config)?;
//!
//! // Prints one line per step; never aborts on a failed step
//! let reports = sequencer.run().await;
//! assert_eq!(reports.len(), 4);
//! ```

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod params;
pub mod payload;
pub mod sequencer;

pub use action::EndpointAction;
pub use config::{DeployerConfig, Readiness, SequencePlan};
pub use dispatcher::Dispatcher;
pub use error::DeployerError;
pub use outcome::Outcome;
pub use params::DeploymentParameters;
pub use payload::{ContractState, DeployReceipt, ParameterMismatch, ServerStatus};
pub use sequencer::{SequenceState, Sequencer, Step, StepReport};

// Common result type
pub type Result<T> = std::result::Result<T, DeployerError>;
