//! Channel configuration planner.
//!
//! Turns an environment snapshot and a registry snapshot into the ordered
//! invocation plan that configures the bridge channels, or fails before any
//! invocation exists.

use tracing::{debug, info};

use crate::config::{ChannelConfig, ChannelLayout, ConfigParser, ParameterNames};
use crate::error::{self, PlanError};
use crate::registry::{ArtifactLoader, DeploymentRegistry};

use super::params::{validate_parameters, Environment, ValidatedParameters};
use super::plan::{Argument, InvocationPlan, InvocationPlanEntry};
use super::resolve::{resolve_records, ResolvedRecords};

/// Stages of a planning attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanningStage {
    /// Checking required parameters.
    Validating,
    /// Looking up deployment records.
    Resolving,
    /// A complete plan was built.
    PlanReady,
    /// The attempt stopped.
    Failed(PlanError),
}

/// Outcome of a planning attempt with the stages it went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanAttempt {
    /// Stages entered, in order.
    pub stages: Vec<PlanningStage>,
    /// The plan, or the error that stopped the attempt.
    pub outcome: Result<InvocationPlan, PlanError>,
}

/// Planner for the channel configuration step.
///
/// The planner owns no mutable state; it can be shared between independent
/// runs.
#[derive(Debug, Clone)]
pub struct ConfigurationPlanner {
    /// Record names to resolve.
    layout: ChannelLayout,
    /// Environment keys of the required parameters.
    parameters: ParameterNames,
    /// Address of the account issuing the invocations.
    operator: String,
}

impl ConfigurationPlanner {
    /// Creates a planner with the default layout and parameter names.
    #[must_use]
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            layout: ChannelLayout::default(),
            parameters: ParameterNames::default(),
            operator: operator.into(),
        }
    }

    /// Sets the channel layout.
    #[must_use]
    pub fn with_layout(mut self, layout: ChannelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the parameter names.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ParameterNames) -> Self {
        self.parameters = parameters;
        self
    }

    /// Creates a planner from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` for the first absent required parameter,
    /// then for a missing operator address.
    pub fn from_config(config: &ChannelConfig, env: &Environment) -> error::Result<Self> {
        validate_parameters(&config.parameters.required(), env)?;
        let operator = ConfigParser::resolve_operator(config, env)?;

        Ok(Self::new(operator)
            .with_layout(config.records.clone())
            .with_parameters(config.parameters.clone()))
    }

    /// Returns the operator address.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Plans the configuration step.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` if a required parameter is absent, checked
    /// before any registry lookup, or `UnresolvedRecord` if a channel or
    /// application record is not deployed.
    pub fn plan<R>(&self, env: &Environment, registry: &R) -> Result<InvocationPlan, PlanError>
    where
        R: DeploymentRegistry + ?Sized,
    {
        self.attempt(env, registry).outcome
    }

    /// Runs a planning attempt and records every stage it enters.
    pub fn attempt<R>(&self, env: &Environment, registry: &R) -> PlanAttempt
    where
        R: DeploymentRegistry + ?Sized,
    {
        let mut stages = vec![PlanningStage::Validating];
        debug!("Validating required parameters: {:?}", self.parameters.required());

        let params = match validate_parameters(&self.parameters.required(), env) {
            Ok(params) => params,
            Err(e) => return Self::failed(stages, e),
        };

        stages.push(PlanningStage::Resolving);
        debug!("Resolving deployment records: {:?}", self.layout.record_names());

        let records = match resolve_records(&self.layout.record_names(), registry) {
            Ok(records) => records,
            Err(e) => return Self::failed(stages, e),
        };

        match self.build_plan(&params, &records) {
            Ok(plan) => {
                stages.push(PlanningStage::PlanReady);
                info!("Planned {} invocations", plan.len());
                PlanAttempt {
                    stages,
                    outcome: Ok(plan),
                }
            }
            Err(e) => Self::failed(stages, e),
        }
    }

    /// Builds the three configuration invocations in their fixed order.
    ///
    /// # Errors
    ///
    /// Returns an error only if `params` or `records` were produced for a
    /// different parameter set or layout than this planner's.
    pub fn build_plan(
        &self,
        params: &ValidatedParameters,
        records: &ResolvedRecords,
    ) -> Result<InvocationPlan, PlanError> {
        let layout = &self.layout;

        let principal = params.require(&self.parameters.principal)?;
        let fee = params.require(&self.parameters.fee)?;

        let basic_inbound = records.address(&layout.basic_inbound)?;
        let incentivized_inbound = records.address(&layout.incentivized_inbound)?;
        let app = records.address(&layout.app)?;

        // Outbound channels both need to know every inbound channel.
        let inbound_channels = || {
            Argument::List(vec![
                Argument::address(basic_inbound),
                Argument::address(incentivized_inbound),
            ])
        };
        let apps = || Argument::List(vec![Argument::address(app)]);

        let entries = vec![
            InvocationPlanEntry::initialize(
                &layout.basic_outbound,
                vec![inbound_channels(), Argument::literal(principal), apps()],
            ),
            InvocationPlanEntry::initialize(
                &layout.incentivized_outbound,
                vec![inbound_channels(), apps(), Argument::literal(fee)],
            ),
            InvocationPlanEntry::initialize(
                &layout.incentivized_inbound,
                vec![
                    Argument::address(self.operator.as_str()),
                    Argument::address(app),
                ],
            ),
        ];

        Ok(InvocationPlan::new(entries))
    }

    fn failed(mut stages: Vec<PlanningStage>, error: PlanError) -> PlanAttempt {
        debug!("Planning failed: {error}");
        stages.push(PlanningStage::Failed(error.clone()));
        PlanAttempt {
            stages,
            outcome: Err(error),
        }
    }
}

/// Plans the configuration step of `config` against the network's artifacts.
///
/// Parameters and the operator are checked before `loader` touches the
/// filesystem.
///
/// # Errors
///
/// Returns `MissingParameter`, a registry error, or `UnresolvedRecord`, in
/// that order of precedence.
pub async fn plan_for_config(
    config: &ChannelConfig,
    env: &Environment,
    loader: &ArtifactLoader,
) -> error::Result<InvocationPlan> {
    let planner = ConfigurationPlanner::from_config(config, env)?;
    info!(
        "Planning {} on {} as {}",
        config.step_id,
        config.network,
        planner.operator()
    );

    let registry = loader.load(&config.network).await?;
    Ok(planner.plan(env, &registry)?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;
    use crate::config::OPERATOR_ENV;
    use crate::error::{ChannelConfigError, RegistryError};
    use crate::registry::{DeploymentRecord, InMemoryRegistry};

    const OPERATOR: &str = "0xOPERATOR";

    fn full_env() -> Environment {
        Environment::from([
            (String::from("BASIC_CHANNEL_PRINCIPAL"), String::from("0xABC")),
            (String::from("INCENTIVIZED_CHANNEL_FEE"), String::from("100")),
        ])
    }

    fn full_registry() -> InMemoryRegistry {
        InMemoryRegistry::from_records([
            DeploymentRecord::new("BasicInboundChannel", "0xBIN"),
            DeploymentRecord::new("BasicOutboundChannel", "0xBOUT"),
            DeploymentRecord::new("IncentivizedInboundChannel", "0xIIN"),
            DeploymentRecord::new("IncentivizedOutboundChannel", "0xIOUT"),
            DeploymentRecord::new("ETHApp", "0xAPP"),
        ])
    }

    /// Registry that counts lookups.
    #[derive(Default)]
    struct CountingRegistry {
        inner: InMemoryRegistry,
        lookups: AtomicUsize,
    }

    impl DeploymentRegistry for CountingRegistry {
        fn get(&self, name: &str) -> Option<DeploymentRecord> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.get(name)
        }
    }

    fn inbound() -> Argument {
        Argument::List(vec![Argument::address("0xBIN"), Argument::address("0xIIN")])
    }

    fn apps() -> Argument {
        Argument::List(vec![Argument::address("0xAPP")])
    }

    #[test]
    fn test_full_plan() {
        let plan = ConfigurationPlanner::new(OPERATOR)
            .plan(&full_env(), &full_registry())
            .expect("plan should build");

        assert_eq!(plan.len(), 3);
        assert_eq!(
            plan.targets(),
            vec![
                "BasicOutboundChannel",
                "IncentivizedOutboundChannel",
                "IncentivizedInboundChannel",
            ]
        );

        assert_eq!(
            plan.entries[0],
            InvocationPlanEntry::initialize(
                "BasicOutboundChannel",
                vec![inbound(), Argument::literal("0xABC"), apps()],
            )
        );
        assert_eq!(
            plan.entries[1],
            InvocationPlanEntry::initialize(
                "IncentivizedOutboundChannel",
                vec![inbound(), apps(), Argument::literal("100")],
            )
        );
        assert_eq!(
            plan.entries[2],
            InvocationPlanEntry::initialize(
                "IncentivizedInboundChannel",
                vec![Argument::address(OPERATOR), Argument::address("0xAPP")],
            )
        );
    }

    #[test]
    fn test_planning_is_deterministic() {
        let planner = ConfigurationPlanner::new(OPERATOR);
        let first = planner.plan(&full_env(), &full_registry());
        let second = planner.plan(&full_env(), &full_registry());

        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_fee_fails_before_lookup() {
        let mut env = full_env();
        env.remove("INCENTIVIZED_CHANNEL_FEE");
        let registry = CountingRegistry {
            inner: full_registry(),
            ..CountingRegistry::default()
        };

        let attempt = ConfigurationPlanner::new(OPERATOR).attempt(&env, &registry);

        let expected = PlanError::missing_parameter("INCENTIVIZED_CHANNEL_FEE");
        assert_eq!(attempt.outcome, Err(expected.clone()));
        assert_eq!(
            attempt.stages,
            vec![PlanningStage::Validating, PlanningStage::Failed(expected)]
        );
        assert_eq!(registry.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_record() {
        let mut registry = InMemoryRegistry::new();
        for record in full_registry().records() {
            if record.name != "IncentivizedInboundChannel" {
                registry.insert(record.clone());
            }
        }

        let attempt = ConfigurationPlanner::new(OPERATOR).attempt(&full_env(), &registry);

        let expected = PlanError::unresolved_record("IncentivizedInboundChannel");
        assert_eq!(attempt.outcome, Err(expected.clone()));
        assert_eq!(
            attempt.stages,
            vec![
                PlanningStage::Validating,
                PlanningStage::Resolving,
                PlanningStage::Failed(expected),
            ]
        );
    }

    #[test]
    fn test_missing_parameter_reported_before_missing_record() {
        let env = Environment::from([(
            String::from("BASIC_CHANNEL_PRINCIPAL"),
            String::from("0xABC"),
        )]);

        let result = ConfigurationPlanner::new(OPERATOR).plan(&env, &InMemoryRegistry::new());
        assert_eq!(
            result,
            Err(PlanError::missing_parameter("INCENTIVIZED_CHANNEL_FEE"))
        );
    }

    #[test]
    fn test_zero_fee_is_accepted() {
        let mut env = full_env();
        env.insert(String::from("INCENTIVIZED_CHANNEL_FEE"), String::from("0"));

        let plan = ConfigurationPlanner::new(OPERATOR)
            .plan(&env, &full_registry())
            .expect("plan should build");
        assert_eq!(plan.entries[1].args[2], Argument::literal("0"));
    }

    #[test]
    fn test_custom_layout_and_parameters() {
        let layout = ChannelLayout {
            app: String::from("ERC20App"),
            ..ChannelLayout::default()
        };
        let parameters = ParameterNames {
            principal: String::from("PRINCIPAL"),
            fee: String::from("FEE"),
        };
        let env = Environment::from([
            (String::from("PRINCIPAL"), String::from("0xP")),
            (String::from("FEE"), String::from("7")),
        ]);
        let mut registry = full_registry();
        registry.insert(DeploymentRecord::new("ERC20App", "0xERC"));

        let plan = ConfigurationPlanner::new(OPERATOR)
            .with_layout(layout)
            .with_parameters(parameters)
            .plan(&env, &registry)
            .expect("plan should build");

        assert_eq!(plan.entries[0].args[1], Argument::literal("0xP"));
        assert_eq!(plan.entries[2].args[1], Argument::address("0xERC"));
    }

    #[test]
    fn test_build_plan_rejects_foreign_inputs() {
        let planner = ConfigurationPlanner::new(OPERATOR);
        let params = validate_parameters(&planner.parameters.required(), &full_env())
            .expect("should validate");
        let records = resolve_records(&["ETHApp"], &full_registry()).expect("should resolve");

        assert_eq!(
            planner.build_plan(&params, &records),
            Err(PlanError::unresolved_record("BasicInboundChannel"))
        );
    }

    fn operator_config() -> ChannelConfig {
        let mut config = ChannelConfig::for_network("local");
        config.operator = Some(String::from(OPERATOR));
        config
    }

    fn write_artifacts(dir: &std::path::Path) {
        let network = dir.join("local");
        std::fs::create_dir_all(&network).expect("Failed to create network dir");
        for record in full_registry().records() {
            std::fs::write(
                network.join(format!("{}.json", record.name)),
                format!(r#"{{"address": "{}"}}"#, record.address),
            )
            .expect("Failed to write artifact");
        }
        std::fs::write(network.join("UnrelatedLib.json"), r#"{"abi": []}"#)
            .expect("Failed to write artifact");
    }

    #[tokio::test]
    async fn test_missing_parameter_reported_before_operator_and_artifacts() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let loader = ArtifactLoader::new(temp.path().join("missing"));

        let config = ChannelConfig::for_network("local");
        let result = plan_for_config(&config, &Environment::new(), &loader).await;
        assert!(matches!(
            result,
            Err(ChannelConfigError::Plan(PlanError::MissingParameter { ref name }))
                if name == "BASIC_CHANNEL_PRINCIPAL"
        ));
    }

    #[tokio::test]
    async fn test_missing_operator_reported_before_artifacts() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let loader = ArtifactLoader::new(temp.path().join("missing"));

        let config = ChannelConfig::for_network("local");
        let result = plan_for_config(&config, &full_env(), &loader).await;
        assert!(matches!(
            result,
            Err(ChannelConfigError::Plan(PlanError::MissingParameter { ref name }))
                if name == OPERATOR_ENV
        ));
    }

    #[tokio::test]
    async fn test_missing_deployments_reported_after_inputs() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let loader = ArtifactLoader::new(temp.path().join("missing"));

        let result = plan_for_config(&operator_config(), &full_env(), &loader).await;
        assert!(matches!(
            result,
            Err(ChannelConfigError::Registry(RegistryError::DirectoryNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_plan_for_config_ignores_unrelated_artifacts() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write_artifacts(temp.path());

        let mut env = full_env();
        env.insert(String::from(OPERATOR_ENV), String::from(OPERATOR));
        let plan = plan_for_config(
            &ChannelConfig::for_network("local"),
            &env,
            &ArtifactLoader::new(temp.path()),
        )
        .await
        .expect("plan should build");

        let expected = ConfigurationPlanner::new(OPERATOR)
            .plan(&full_env(), &full_registry())
            .expect("plan should build");
        assert_eq!(plan, expected);
    }
}
