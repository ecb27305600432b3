use super::{CREATE_POLICY, POLICY_ISSUED};
use crate::collection::QueryRecord;
use crate::context::InvocationContext;
use crate::contract::{Args, ContractService, json_payload};
use crate::core::{LedgerError, Result};
use crate::model::{Policy, PolicyType};
use async_trait::async_trait;

pub struct PolicyService;

impl PolicyService {
    #[allow(clippy::too_many_arguments)]
    pub async fn request_policy(
        ctx: &InvocationContext<'_>,
        id: &str,
        vehicle_id: &str,
        insurer_id: &str,
        holder_id: &str,
        policy_type: PolicyType,
        start_date: i64,
        end_date: i64,
    ) -> Result<Policy> {
        if !ctx.vehicle_list().exists(vehicle_id).await? {
            return Err(LedgerError::PreconditionFailed(format!(
                "cannot request policy '{}': no vehicle exists with id '{}'",
                id, vehicle_id
            )));
        }

        let policy = Policy::request(
            id,
            vehicle_id,
            insurer_id,
            holder_id,
            policy_type,
            start_date,
            end_date,
        )?;
        ctx.policy_list().add(&policy).await?;

        ctx.emit(CREATE_POLICY, &policy)?;
        Ok(policy)
    }

    pub async fn get_policy(ctx: &InvocationContext<'_>, id: &str) -> Result<Policy> {
        ctx.policy_list().get(id).await
    }

    pub async fn get_policies(ctx: &InvocationContext<'_>) -> Result<Vec<QueryRecord<Policy>>> {
        ctx.policy_list().get_all().await
    }

    pub async fn issue_policy(ctx: &InvocationContext<'_>, id: &str) -> Result<Policy> {
        let list = ctx.policy_list();
        let mut policy = list.get(id).await?;
        policy.issue();
        list.update(&policy).await?;

        ctx.emit(POLICY_ISSUED, &policy)?;
        Ok(policy)
    }
}

#[async_trait]
impl ContractService for PolicyService {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn transactions(&self) -> &'static [&'static str] {
        &["requestPolicy", "getPolicy", "issuePolicy", "getPolicies"]
    }

    async fn invoke(&self, ctx: &InvocationContext<'_>, args: Args<'_>) -> Result<Vec<u8>> {
        match ctx.function() {
            "requestPolicy" => {
                args.expect(7)?;
                let policy = Self::request_policy(
                    ctx,
                    args.get(0, "id")?,
                    args.get(1, "vehicleId")?,
                    args.get(2, "insurerId")?,
                    args.get(3, "holderId")?,
                    args.parse(4, "policyType")?,
                    args.timestamp(5, "startDate")?,
                    args.timestamp(6, "endDate")?,
                )
                .await?;
                json_payload(&policy)
            }
            "getPolicy" => {
                args.expect(1)?;
                json_payload(&Self::get_policy(ctx, args.get(0, "policyId")?).await?)
            }
            "issuePolicy" => {
                args.expect(1)?;
                json_payload(&Self::issue_policy(ctx, args.get(0, "policyId")?).await?)
            }
            "getPolicies" => {
                args.expect(0)?;
                json_payload(&Self::get_policies(ctx).await?)
            }
            other => Err(LedgerError::UnknownTransaction(other.to_string())),
        }
    }
}
