//! Outbound request client
//!
//! Thin wrapper around a shared `reqwest::Client`. Every external call in
//! this system is best-effort and attempted exactly once; failures map to
//! `Error::ServiceUnavailable` and are absorbed by the caller.

use serde::{Serialize, de::DeserializeOwned};

use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct Request(reqwest::Client);

impl Request {
	pub fn new() -> Self {
		Request(reqwest::Client::new())
	}

	pub async fn get_json<Res>(&self, url: &str) -> QbResult<Res>
	where
		Res: DeserializeOwned,
	{
		let res = self
			.0
			.get(url)
			.send()
			.await
			.and_then(|res| res.error_for_status())
			.map_err(|err| Error::ServiceUnavailable(format!("GET {} failed: {}", url, err)))?;
		res.json()
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("GET {} bad response: {}", url, err)))
	}

	pub async fn post_json<Res>(&self, url: &str, body: &impl Serialize) -> QbResult<Res>
	where
		Res: DeserializeOwned,
	{
		let res = self
			.0
			.post(url)
			.json(body)
			.send()
			.await
			.and_then(|res| res.error_for_status())
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} failed: {}", url, err)))?;
		res.json()
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} bad response: {}", url, err)))
	}

	/// POST a form body and return the raw response text.
	pub async fn post_form_text(&self, url: &str, form: &impl Serialize) -> QbResult<String> {
		let res = self
			.0
			.post(url)
			.form(form)
			.send()
			.await
			.and_then(|res| res.error_for_status())
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} failed: {}", url, err)))?;
		res.text()
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} bad response: {}", url, err)))
	}

	/// POST a pre-serialized JSON body with extra headers. Used for signed
	/// provider requests where the signature covers the exact byte payload.
	pub async fn post_signed_json<Res>(
		&self,
		url: &str,
		headers: &[(&str, String)],
		body: String,
	) -> QbResult<Res>
	where
		Res: DeserializeOwned,
	{
		let mut req = self.0.post(url).header("content-type", "application/json; charset=utf-8");
		for (name, value) in headers {
			req = req.header(*name, value);
		}
		let res = req
			.body(body)
			.send()
			.await
			.and_then(|res| res.error_for_status())
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} failed: {}", url, err)))?;
		res.json()
			.await
			.map_err(|err| Error::ServiceUnavailable(format!("POST {} bad response: {}", url, err)))
	}
}

// vim: ts=4
