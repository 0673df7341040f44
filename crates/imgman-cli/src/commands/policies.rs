use std::io::Write;

use anyhow::anyhow;
use imgman_api::{Network, NetworkTarget};
use serde_json::Value;

use crate::cli::{
    DeletePolicyArgs, GetPolicyArgs, ListPoliciesArgs, OutputType, SetPolicyArgs,
};
use crate::client::{AppContext, CliError, CliResult, read_input_file, write_failed};
use crate::output::{render_json, render_policy_table};

pub(crate) async fn handle_list_policies(
    ctx: &mut AppContext,
    args: ListPoliciesArgs,
    out: &mut (impl Write + Send),
) -> CliResult<()> {
    let target = NetworkTarget::from(args.network);
    writeln!(
        out,
        "Policy: {}\tNetwork: {}\tOutput: {}",
        ctx.policy_set,
        target,
        args.output_type.as_str()
    )
    .map_err(write_failed)?;

    for network in target.networks() {
        if target == NetworkTarget::Both {
            writeln!(out, "\n{}", network.heading()).map_err(write_failed)?;
        }
        let list = ctx
            .manager
            .list_policies(&ctx.policy_set, *network, &ctx.account_key)
            .await?;
        let rendered = match args.output_type {
            OutputType::Json => render_json(&list)?,
            OutputType::Text => render_policy_table(&list),
        };
        writeln!(out, "{rendered}").map_err(write_failed)?;
    }
    Ok(())
}

pub(crate) async fn handle_get_policy(
    ctx: &mut AppContext,
    args: GetPolicyArgs,
    out: &mut (impl Write + Send),
) -> CliResult<()> {
    let network = Network::from(args.network);
    let policy = ctx
        .manager
        .get_policy(&ctx.policy_set, &args.name, network, &ctx.account_key)
        .await?;
    let rendered = render_json(&policy)?;
    let destination = args
        .output_file
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |path| path.display().to_string());
    writeln!(
        out,
        "Policy: {}\tNetwork: {network}\tOutput: {destination}",
        ctx.policy_set
    )
    .map_err(write_failed)?;

    match args.output_file {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(|err| {
                CliError::failure(anyhow!(
                    "failed to write policy to '{}': {err}",
                    path.display()
                ))
            })?;
            tracing::info!(policy = %args.name, path = %path.display(), "policy saved");
        }
        None => writeln!(out, "{rendered}").map_err(write_failed)?,
    }
    Ok(())
}

pub(crate) async fn handle_set_policy(
    ctx: &mut AppContext,
    args: SetPolicyArgs,
    out: &mut (impl Write + Send),
) -> CliResult<()> {
    let body = read_input_file(&args.input_file)?;
    let target = NetworkTarget::from(args.network);

    for network in target.networks() {
        if target == NetworkTarget::Both {
            writeln!(out, "{}", network.heading()).map_err(write_failed)?;
        }
        let result = ctx
            .manager
            .set_policy(&ctx.policy_set, &args.name, &body, *network, &ctx.account_key)
            .await?;
        print_json(out, &result)?;
    }
    Ok(())
}

pub(crate) async fn handle_delete_policy(
    ctx: &mut AppContext,
    args: DeletePolicyArgs,
    out: &mut (impl Write + Send),
) -> CliResult<()> {
    let result = ctx
        .manager
        .delete_policy(
            &ctx.policy_set,
            &args.name,
            NetworkTarget::from(args.network),
            &ctx.account_key,
        )
        .await?;
    print_json(out, &result)
}

fn print_json(out: &mut impl Write, value: &Value) -> CliResult<()> {
    let rendered = render_json(value)?;
    writeln!(out, "{rendered}").map_err(write_failed)
}
