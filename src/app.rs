//! Request/response driver: one dial, one call, formatted output

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::InvocationRequest;
use crate::config::Config;
use crate::domain::abi::resolve_abi;
use crate::domain::{checksummed, coerce_args};
use crate::infrastructure::{create_provider, EthereumProvider, GenericContract, ProviderConfig};
use crate::output;

/// Dial the configured endpoint and run the request against it
pub async fn run(request: InvocationRequest, config: &Config) -> Result<()> {
    let endpoint = config.resolve_rpc(request.rpc.as_deref());
    let provider = create_provider(ProviderConfig::from_endpoint(&endpoint))
        .await
        .context("Failed to connect to the Ethereum client")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Connected to Ethereum node at {}", provider.endpoint_name())?;

    execute(provider.as_ref(), &request, &mut out).await
}

/// Everything after the dial: ABI selection, argument coercion, the call and
/// result printing. Every failure is returned to the caller.
pub async fn execute<W: Write>(
    provider: &dyn EthereumProvider,
    request: &InvocationRequest,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Using contract address: {}", checksummed(&request.contract))?;

    let (abi_text, source) = resolve_abi(request.abi_file.as_deref(), request.kind, &request.function)?;
    debug!(source = %source, "selected ABI");

    let contract = GenericContract::new(request.contract, &abi_text)
        .context("Failed to instantiate the contract")?;

    let args = coerce_args(&request.args)?;
    for (index, arg) in args.iter().enumerate() {
        debug!(index, arg = %arg, "coerced argument");
    }

    writeln!(
        out,
        "Calling function '{}' with {} arguments",
        request.function,
        args.len()
    )?;

    let results = contract
        .call_view(provider, &request.function, &args)
        .await
        .with_context(|| format!("Failed to call function '{}'", request.function))?;

    writeln!(out, "Function returned successfully!")?;
    output::write_results(out, &results, request.convert)?;

    Ok(())
}
