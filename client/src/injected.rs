use js_sys::{Function, Promise, Reflect, JSON};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{ClientError, ClientResult};
use crate::rpc::{rpc_error, RpcProvider, Transport};

/// The browser wallet injected as `window.ethereum`.
pub struct InjectedTransport {
    ethereum: JsValue,
}

pub type InjectedProvider = RpcProvider<InjectedTransport>;

impl InjectedTransport {
    /// Looks up `window.ethereum`. Fails with `ProviderMissing` when no wallet is installed.
    pub fn detect() -> ClientResult<Self> {
        let window = web_sys::window().ok_or(ClientError::ProviderMissing)?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map_err(|_| ClientError::ProviderMissing)?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return Err(ClientError::ProviderMissing);
        }
        Ok(Self { ethereum })
    }
}

impl InjectedProvider {
    pub fn detect() -> ClientResult<Self> {
        InjectedTransport::detect().map(RpcProvider::new)
    }
}

/// Routes `tracing` output to the browser console.
pub fn init_logging() {
    tracing_wasm::set_as_global_default();
}

impl Transport for InjectedTransport {
    async fn request(&self, method: &'static str, params: Vec<Value>) -> ClientResult<Value> {
        let args = serde_json::json!({ "method": method, "params": params }).to_string();
        let args = JSON::parse(&args).map_err(|e| ClientError::Transport(format!("{:?}", e)))?;

        let request_fn = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(|_| ClientError::Transport("No request method".to_string()))?;
        let request_fn: Function = request_fn
            .dyn_into()
            .map_err(|_| ClientError::Transport("request is not a function".to_string()))?;

        let promise = request_fn
            .call1(&self.ethereum, &args)
            .map_err(js_error)?;
        let promise: Promise = promise
            .dyn_into()
            .map_err(|_| ClientError::Transport("Not a promise".to_string()))?;

        let result = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(js_error)?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        let json = JSON::stringify(&result)
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;
        let json: String = json.into();
        Ok(serde_json::from_str(&json)?)
    }
}

/// Converts a rejected wallet promise into a client error, keeping its code and message.
fn js_error(error: JsValue) -> ClientError {
    let code = Reflect::get(&error, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error));
    match code {
        Some(code) => rpc_error(code, message),
        None => ClientError::Transport(message),
    }
}
