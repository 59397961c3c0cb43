//! Fixed-order deployment run: wait, status, contract, deploy, contract
//!
//! Every step runs regardless of how the previous one ended. A server error
//! or an unreachable server is reported and the run moves on.

use std::fmt;

use crate::action::EndpointAction;
use crate::config::{DeployerConfig, Readiness, SequencePlan};
use crate::dispatcher::Dispatcher;
use crate::error::DeployerError;
use crate::outcome::Outcome;
use crate::payload::{ContractState, DeployReceipt};

/// Where a run currently is. Transitions are strictly linear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    WaitedForServer,
    StatusChecked,
    ContractCheckedPre,
    Deployed,
    ContractCheckedPost,
}

impl SequenceState {
    /// Next state, or `None` once terminal
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::WaitedForServer),
            Self::WaitedForServer => Some(Self::StatusChecked),
            Self::StatusChecked => Some(Self::ContractCheckedPre),
            Self::ContractCheckedPre => Some(Self::Deployed),
            Self::Deployed => Some(Self::ContractCheckedPost),
            Self::ContractCheckedPost => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ContractCheckedPost)
    }
}

/// A dispatching step of the run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    StatusCheck,
    PreDeployContractCheck,
    Deploy,
    PostDeployContractCheck,
}

impl Step {
    /// Steps of a plan, in execution order
    pub fn plan(plan: SequencePlan) -> &'static [Step] {
        match plan {
            SequencePlan::Full => &[
                Step::StatusCheck,
                Step::PreDeployContractCheck,
                Step::Deploy,
                Step::PostDeployContractCheck,
            ],
            SequencePlan::InspectOnly => &[Step::StatusCheck, Step::PreDeployContractCheck],
        }
    }

    pub const fn action(self) -> EndpointAction {
        match self {
            Self::StatusCheck => EndpointAction::CheckServer,
            Self::PreDeployContractCheck | Self::PostDeployContractCheck => {
                EndpointAction::CheckContract
            }
            Self::Deploy => EndpointAction::Deploy,
        }
    }

    /// State reached once this step has completed
    pub const fn completes(self) -> SequenceState {
        match self {
            Self::StatusCheck => SequenceState::StatusChecked,
            Self::PreDeployContractCheck => SequenceState::ContractCheckedPre,
            Self::Deploy => SequenceState::Deployed,
            Self::PostDeployContractCheck => SequenceState::ContractCheckedPost,
        }
    }
}

/// Outcome of one step, as reported to the observer
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub step: Step,
    pub action: EndpointAction,
    pub outcome: Outcome,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action, self.outcome)
    }
}

/// Runs the deployment steps in order against one server
pub struct Sequencer {
    config: DeployerConfig,
    dispatcher: Dispatcher,
    state: SequenceState,
}

impl Sequencer {
    pub fn new(config: DeployerConfig) -> Result<Self, DeployerError> {
        let dispatcher = Dispatcher::new(config.server_url.clone(), config.request_timeout)?;
        Ok(Self {
            config,
            dispatcher,
            state: SequenceState::Idle,
        })
    }

    pub fn config(&self) -> &DeployerConfig {
        &self.config
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Run every step, printing each outcome to stdout as it completes
    pub async fn run(&mut self) -> Vec<StepReport> {
        self.run_with(|report| println!("{}", report)).await
    }

    /// Run every step, handing each report to `observer` as it completes.
    ///
    /// Returns the reports in execution order. A run always goes to the end
    /// of its plan; nothing here aborts early.
    pub async fn run_with<F>(&mut self, mut observer: F) -> Vec<StepReport>
    where
        F: FnMut(&StepReport),
    {
        self.state = SequenceState::Idle;
        self.wait_for_server().await;
        self.advance(SequenceState::WaitedForServer);

        let steps = Step::plan(self.config.plan);
        let mut reports = Vec::with_capacity(steps.len());

        for &step in steps {
            let outcome = match step {
                Step::Deploy => self.dispatcher.deploy(&self.config.deployment).await,
                other => self.dispatcher.dispatch(other.action(), None).await,
            };

            let report = StepReport {
                step,
                action: step.action(),
                outcome,
            };
            log::info!("{:?} finished: {}", step, report.outcome);
            observer(&report);
            reports.push(report);

            self.advance(step.completes());
        }

        if self.config.plan == SequencePlan::Full {
            self.confirm_deployment(&reports);
        }

        reports
    }

    async fn wait_for_server(&self) {
        match self.config.readiness {
            Readiness::FixedDelay(delay) => {
                if !delay.is_zero() {
                    log::info!("Waiting {:?} for the server to start", delay);
                    tokio::time::sleep(delay).await;
                }
            }
            Readiness::Poll {
                interval,
                max_attempts,
            } => {
                for attempt in 1..=max_attempts {
                    if !self.dispatcher.check_server().await.is_unreachable() {
                        log::info!("Server answered after {} probe(s)", attempt);
                        return;
                    }

                    log::debug!(
                        "Server not reachable yet (attempt {}/{})",
                        attempt,
                        max_attempts
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(interval).await;
                    }
                }
                log::warn!(
                    "Server still unreachable after {} probes, proceeding anyway",
                    max_attempts
                );
            }
        }
    }

    fn advance(&mut self, to: SequenceState) {
        debug_assert_eq!(self.state.next(), Some(to), "non-linear sequence transition");
        log::debug!("{:?} -> {:?}", self.state, to);
        self.state = to;
    }

    /// Log whether the post-deploy check reflects what was deployed
    fn confirm_deployment(&self, reports: &[StepReport]) {
        let find = |step: Step| reports.iter().find(|r| r.step == step).map(|r| &r.outcome);

        let Some(receipt) = find(Step::Deploy).and_then(|o| o.decode::<DeployReceipt>()) else {
            return;
        };
        let Some(state) =
            find(Step::PostDeployContractCheck).and_then(|o| o.decode::<ContractState>())
        else {
            log::warn!(
                "Deployed {} but the follow-up contract check gave no contract state",
                receipt.contract_address
            );
            return;
        };

        if let Some(contract) = &state.contract {
            if !contract.eq_ignore_ascii_case(&receipt.contract_address) {
                log::warn!(
                    "Contract check reports {} but deploy returned {}",
                    contract,
                    receipt.contract_address
                );
            }
        }

        let mismatches = state.mismatches(&self.config.deployment);
        if mismatches.is_empty() {
            log::info!("Deployment of {} confirmed", receipt.contract_address);
        }
        for m in mismatches {
            log::warn!(
                "Contract {} differs from deploy request: sent {}, reported {}",
                m.field,
                m.sent,
                m.reported
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_is_linear() {
        let mut state = SequenceState::Idle;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            state = next;
            visited.push(state);
        }

        assert_eq!(
            visited,
            vec![
                SequenceState::Idle,
                SequenceState::WaitedForServer,
                SequenceState::StatusChecked,
                SequenceState::ContractCheckedPre,
                SequenceState::Deployed,
                SequenceState::ContractCheckedPost,
            ]
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_full_plan_order() {
        let actions: Vec<_> = Step::plan(SequencePlan::Full)
            .iter()
            .map(|s| s.action())
            .collect();
        assert_eq!(
            actions,
            vec![
                EndpointAction::CheckServer,
                EndpointAction::CheckContract,
                EndpointAction::Deploy,
                EndpointAction::CheckContract,
            ]
        );
    }

    #[test]
    fn test_inspect_plan_skips_deploy() {
        let steps = Step::plan(SequencePlan::InspectOnly);
        assert_eq!(steps, &[Step::StatusCheck, Step::PreDeployContractCheck]);
    }

    #[test]
    fn test_report_display() {
        let report = StepReport {
            step: Step::Deploy,
            action: EndpointAction::Deploy,
            outcome: Outcome::Unreachable,
        };
        assert_eq!(report.to_string(), "deploy: failed to connect to server");
    }
}
