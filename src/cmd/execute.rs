use tokio::task::JoinSet;

use super::{
    conduit::Conduit,
    execution_plan::ExecutionPlan,
    stage::{Stage, StageRunner, StageWiring},
};
use crate::{
    process::status::{ExecutionResult, StageStatus},
    state::ShellContext,
};

impl ExecutionPlan {
    /// Runs every stage of the plan and reports the final stage's result.
    ///
    /// Stages are launched in order, each reading the conduit left by the
    /// previous one. A failing or missing stage never stops the stages after
    /// it. Returns only once every stage has completed, in whatever order
    /// the processes happen to exit.
    pub async fn execute(&self, ctx: &mut ShellContext) -> ExecutionResult {
        let plans = match self {
            Self::Pipeline(stages) if !stages.is_empty() => stages,
            _ => return ExecutionResult::success(),
        };

        let stages = plans
            .iter()
            .map(|plan| Stage::resolve(plan, &ctx.resolver))
            .collect::<Vec<_>>();

        let last = stages.len() - 1;

        let mut outstanding = JoinSet::new();
        let mut feeders = Vec::new();
        let mut conduit = Conduit::Shell;

        for (index, (stage, plan)) in stages.iter().zip(plans).enumerate() {
            trace!(index, program = stage.program(), "launching stage");

            let wiring = StageWiring {
                input: conduit,
                piped: index < last,
                redirects: plan.redirects.clone(),
            };

            let launched = stage.launch(wiring, ctx).await;

            conduit = launched.output;
            feeders.extend(launched.feeder);

            let child = launched.child;
            outstanding.spawn(async move { (index, child.wait().await) });
        }

        drop(conduit);

        trace!(stages = stages.len(), "waiting for pipeline");

        let mut final_status = None;

        while let Some(joined) = outstanding.join_next().await {
            match joined {
                Ok((index, status)) => {
                    trace!(index, code = status.code(), "stage finished");
                    if index == last {
                        final_status = Some(status);
                    }
                }
                Err(err) => error!("stage task failed: {err}"),
            }
        }

        for feeder in feeders {
            if let Err(err) = feeder.await {
                error!("feeder task failed: {err}");
            }
        }

        final_status
            .map(ExecutionResult::from)
            .unwrap_or_else(|| ExecutionResult::from(StageStatus::Aborted(1)))
    }
}
