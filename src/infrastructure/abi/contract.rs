//! Generic contract binding for read-only calls

use alloy::rpc::types::TransactionRequest;
use alloy_dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, Sign, I256, U256};
use thiserror::Error;
use tracing::debug;

use crate::domain::abi::{parse_abi, AbiError};
use crate::domain::CallArg;
use crate::infrastructure::ethereum::EthereumProvider;

#[derive(Debug, Error)]
pub enum CallError {
    #[error("method '{0}' not found in ABI")]
    UnknownFunction(String),
    #[error("method '{name}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("argument {index}: cannot pass {arg} as {ty}")]
    ArgumentType {
        index: usize,
        arg: String,
        ty: String,
    },
    #[error("argument {index}: {value} does not fit in {ty}")]
    OutOfRange {
        index: usize,
        value: String,
        ty: String,
    },
    #[error("invalid parameter type: {0}")]
    ParamType(#[source] alloy_dyn_abi::Error),
    #[error("failed to encode call: {0}")]
    Encode(#[source] alloy_dyn_abi::Error),
    #[error(transparent)]
    Transport(anyhow::Error),
    #[error("no contract code at given address")]
    EmptyReturn,
    #[error("failed to decode return data: {0}")]
    Decode(#[source] alloy_dyn_abi::Error),
}

/// A contract address bound to a parsed ABI
#[derive(Debug, Clone)]
pub struct GenericContract {
    address: Address,
    abi: JsonAbi,
}

impl GenericContract {
    /// Bind `address` to the ABI in `abi_text`
    pub fn new(address: Address, abi_text: &str) -> Result<Self, AbiError> {
        Ok(Self {
            address,
            abi: parse_abi(abi_text)?,
        })
    }

    /// Look up a function by name, picking the first overload whose arity matches
    pub fn function(&self, name: &str, arity: usize) -> Result<&Function, CallError> {
        let overloads = self
            .abi
            .function(name)
            .ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;

        overloads
            .iter()
            .find(|function| function.inputs.len() == arity)
            .ok_or_else(|| CallError::ArityMismatch {
                name: name.to_string(),
                expected: overloads.first().map(|f| f.inputs.len()).unwrap_or(0),
                got: arity,
            })
    }

    /// Encode calldata (selector + arguments) for `function`
    pub fn encode_call(&self, function: &Function, args: &[CallArg]) -> Result<Vec<u8>, CallError> {
        let values = function
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| {
                let ty: DynSolType = param.resolve().map_err(CallError::ParamType)?;
                to_sol_value(index, arg, &ty)
            })
            .collect::<Result<Vec<_>, _>>()?;

        function.abi_encode_input(&values).map_err(CallError::Encode)
    }

    /// Call a view function once and decode its outputs.
    ///
    /// Errors from the transport are passed through unchanged; nothing is retried.
    pub async fn call_view(
        &self,
        provider: &dyn EthereumProvider,
        name: &str,
        args: &[CallArg],
    ) -> Result<Vec<DynSolValue>, CallError> {
        let function = self.function(name, args.len())?;
        let calldata = self.encode_call(function, args)?;
        debug!(
            signature = %function.signature(),
            calldata = %format!("0x{}", hex::encode(&calldata)),
            "encoded call"
        );

        let request = TransactionRequest::default()
            .to(self.address)
            .input(Bytes::from(calldata).into());
        let output = provider.call(request).await.map_err(CallError::Transport)?;
        debug!(output = %output, "raw return data");

        // Empty data from an account without code is reported as such; a
        // deployed contract falls through to the decoder's own error.
        if output.is_empty() && !function.outputs.is_empty() {
            let code = provider
                .get_code_at(self.address)
                .await
                .map_err(CallError::Transport)?;
            if code.is_empty() {
                return Err(CallError::EmptyReturn);
            }
        }

        function.abi_decode_output(&output).map_err(CallError::Decode)
    }
}

/// Convert a sniffed argument into the declared parameter type
fn to_sol_value(index: usize, arg: &CallArg, ty: &DynSolType) -> Result<DynSolValue, CallError> {
    let out_of_range = |value: String| CallError::OutOfRange {
        index,
        value,
        ty: ty.sol_type_name().into_owned(),
    };

    match (arg, ty) {
        (CallArg::Address(address), DynSolType::Address) => Ok(DynSolValue::Address(*address)),
        (CallArg::Uint(value), DynSolType::Uint(bits)) => {
            if value.bit_len() > *bits {
                return Err(out_of_range(value.to_string()));
            }
            Ok(DynSolValue::Uint(*value, *bits))
        }
        (CallArg::Uint(value), DynSolType::Int(bits)) => {
            let signed = I256::checked_from_sign_and_abs(Sign::Positive, *value)
                .filter(|signed| fits_signed(*signed, *bits))
                .ok_or_else(|| out_of_range(value.to_string()))?;
            Ok(DynSolValue::Int(signed, *bits))
        }
        (CallArg::Int(value), DynSolType::Int(bits)) => {
            if !fits_signed(*value, *bits) {
                return Err(out_of_range(value.to_string()));
            }
            Ok(DynSolValue::Int(*value, *bits))
        }
        (CallArg::String(s), DynSolType::String) => Ok(DynSolValue::String(s.clone())),
        _ => Err(CallError::ArgumentType {
            index,
            arg: arg.to_string(),
            ty: ty.sol_type_name().into_owned(),
        }),
    }
}

fn fits_signed(value: I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let (sign, abs) = value.into_sign_and_abs();
    let limit = U256::from(1u8) << (bits - 1);
    match sign {
        Sign::Positive => abs < limit,
        Sign::Negative => abs <= limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{select_abi, ContractKind};
    use crate::domain::parse_address;
    use std::sync::Mutex;

    const TOKEN: &str = "0x3EF98543F9772DC959255545B717a61D408e7b61";

    struct StubProvider {
        response: Bytes,
        code: Bytes,
        requests: Mutex<Vec<TransactionRequest>>,
    }

    impl StubProvider {
        /// Answers every call with `response` from an address holding code
        fn returning(response: impl Into<Bytes>) -> Self {
            Self {
                response: response.into(),
                code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn without_code(mut self) -> Self {
            self.code = Bytes::new();
            self
        }
    }

    #[async_trait::async_trait]
    impl EthereumProvider for StubProvider {
        async fn call(&self, request: TransactionRequest) -> anyhow::Result<Bytes> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }

        async fn get_code_at(&self, _address: Address) -> anyhow::Result<Bytes> {
            Ok(self.code.clone())
        }

        fn endpoint_name(&self) -> String {
            "stub".into()
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl EthereumProvider for FailingProvider {
        async fn call(&self, _request: TransactionRequest) -> anyhow::Result<Bytes> {
            anyhow::bail!("execution reverted")
        }

        async fn get_code_at(&self, _address: Address) -> anyhow::Result<Bytes> {
            anyhow::bail!("connection refused")
        }

        fn endpoint_name(&self) -> String {
            "failing".into()
        }
    }

    fn erc20() -> GenericContract {
        let address = parse_address(TOKEN).unwrap();
        GenericContract::new(address, &select_abi(ContractKind::Erc20, "")).unwrap()
    }

    fn uint_word(value: u128) -> Vec<u8> {
        DynSolValue::Uint(U256::from(value), 256).abi_encode()
    }

    #[test]
    fn test_encode_balance_of() {
        let contract = erc20();
        let holder = parse_address("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0").unwrap();
        let function = contract.function("balanceOf", 1).unwrap();
        let calldata = contract
            .encode_call(function, &[CallArg::Address(holder)])
            .unwrap();

        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(hex::encode(&calldata[..4]), "70a08231");
        assert_eq!(&calldata[16..36], holder.as_slice());
    }

    #[test]
    fn test_unknown_function() {
        let err = erc20().function("mint", 0).unwrap_err();
        assert!(matches!(err, CallError::UnknownFunction(ref name) if name == "mint"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = erc20().function("balanceOf", 0).unwrap_err();
        assert!(matches!(
            err,
            CallError::ArityMismatch { expected: 1, got: 0, .. }
        ));
    }

    #[test]
    fn test_argument_type_mismatch() {
        let contract = erc20();
        let function = contract.function("balanceOf", 1).unwrap();
        let err = contract
            .encode_call(function, &[CallArg::String("alice".into())])
            .unwrap_err();
        assert!(matches!(err, CallError::ArgumentType { index: 0, .. }));
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn test_integer_range_checks() {
        assert!(to_sol_value(0, &CallArg::Uint(U256::from(255)), &DynSolType::Uint(8)).is_ok());
        assert!(matches!(
            to_sol_value(0, &CallArg::Uint(U256::from(256)), &DynSolType::Uint(8)),
            Err(CallError::OutOfRange { .. })
        ));

        let minus_128 = I256::try_from(-128i64).unwrap();
        let minus_129 = I256::try_from(-129i64).unwrap();
        assert!(to_sol_value(0, &CallArg::Int(minus_128), &DynSolType::Int(8)).is_ok());
        assert!(to_sol_value(0, &CallArg::Int(minus_129), &DynSolType::Int(8)).is_err());
        assert!(to_sol_value(0, &CallArg::Uint(U256::from(127)), &DynSolType::Int(8)).is_ok());
        assert!(to_sol_value(0, &CallArg::Uint(U256::from(128)), &DynSolType::Int(8)).is_err());

        // negative values never coerce to unsigned
        assert!(matches!(
            to_sol_value(0, &CallArg::Int(minus_128), &DynSolType::Uint(256)),
            Err(CallError::ArgumentType { .. })
        ));
    }

    #[tokio::test]
    async fn test_call_view_decodes_uint() {
        let provider = StubProvider::returning(uint_word(1_500_000_000_000_000_000));
        let contract = erc20();

        let values = contract.call_view(&provider, "totalSupply", &[]).await.unwrap();
        assert_eq!(
            values,
            vec![DynSolValue::Uint(U256::from(1_500_000_000_000_000_000u128), 256)]
        );

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let input = requests[0].input.input().cloned().unwrap_or_default();
        // totalSupply() selector
        assert_eq!(hex::encode(&input[..]), "18160ddd");
    }

    #[tokio::test]
    async fn test_call_view_generic_fallback() {
        let address = parse_address(TOKEN).unwrap();
        let contract =
            GenericContract::new(address, &select_abi(ContractKind::Generic, "getCount")).unwrap();
        let provider = StubProvider::returning(uint_word(42));

        let values = contract.call_view(&provider, "getCount", &[]).await.unwrap();
        assert_eq!(values, vec![DynSolValue::Uint(U256::from(42), 256)]);
    }

    #[tokio::test]
    async fn test_call_view_empty_return_without_code() {
        let provider = StubProvider::returning(Vec::<u8>::new()).without_code();
        let err = erc20().call_view(&provider, "decimals", &[]).await.unwrap_err();
        assert!(matches!(err, CallError::EmptyReturn));
        assert_eq!(err.to_string(), "no contract code at given address");
    }

    #[tokio::test]
    async fn test_call_view_empty_return_from_deployed_contract() {
        // A contract whose fallback returns nothing for an unknown selector
        let address = parse_address(TOKEN).unwrap();
        let contract =
            GenericContract::new(address, &select_abi(ContractKind::Generic, "foo")).unwrap();
        let provider = StubProvider::returning(Vec::<u8>::new());

        let err = contract.call_view(&provider, "foo", &[]).await.unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_view_decode_mismatch() {
        // Fewer than 32 bytes cannot decode as uint8
        let provider = StubProvider::returning(vec![0u8; 4]);
        let err = erc20().call_view(&provider, "decimals", &[]).await.unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_view_transport_error_passes_through() {
        let err = erc20()
            .call_view(&FailingProvider, "totalSupply", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Transport(_)));
        assert_eq!(err.to_string(), "execution reverted");
    }
}
