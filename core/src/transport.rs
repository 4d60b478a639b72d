//! Executing requests.
//!
//! The core only needs one capability from the network: POST a form and
//! hand back the status and body. `Transport` is that seam. The ureq-backed
//! implementations below are compiled with the default `ureq` feature; hosts
//! with their own HTTP stack implement the trait instead.

use crate::error::ApiError;
use crate::http::HttpResponse;

pub trait Transport: Send + Sync {
    /// POST `fields` form-encoded to `url`.
    ///
    /// Any HTTP status is a response; only failures to get one are errors.
    fn post(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, ApiError> {
        (**self).post(url, fields)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_impl::{for_config, CurlTransport, DirectHttpTransport};

#[cfg(feature = "ureq")]
mod ureq_impl {
    use std::time::Duration;

    use super::Transport;
    use crate::config::{Config, TransportMode, TransportOptions};
    use crate::error::ApiError;
    use crate::http::HttpResponse;

    /// Pick the implementation named by `config.transport_mode`.
    pub fn for_config(config: &Config) -> Box<dyn Transport> {
        let options = config.transport_options();
        match config.transport_mode {
            TransportMode::DirectHttp => Box::new(DirectHttpTransport::new(options)),
            TransportMode::LegacyCurlLike => Box::new(CurlTransport::new(options.timeout)),
        }
    }

    /// Regular HTTP client: bounded redirects and a request timeout
    /// (45 s and 5 hops by default).
    #[derive(Clone)]
    pub struct DirectHttpTransport {
        agent: ureq::Agent,
    }

    impl DirectHttpTransport {
        pub fn new(options: TransportOptions) -> Self {
            Self {
                agent: agent(options),
            }
        }
    }

    impl Default for DirectHttpTransport {
        fn default() -> Self {
            Self::new(TransportOptions::default())
        }
    }

    impl Transport for DirectHttpTransport {
        fn post(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, ApiError> {
            post_form(&self.agent, url, fields)
        }
    }

    /// Bare POST the way a plain curl call makes it: redirects are never
    /// followed, a 3xx comes back as the response itself. No timeout unless
    /// one is given.
    #[derive(Clone)]
    pub struct CurlTransport {
        agent: ureq::Agent,
    }

    impl CurlTransport {
        pub fn new(timeout: Option<Duration>) -> Self {
            Self {
                agent: agent(TransportOptions {
                    timeout,
                    max_redirects: 0,
                }),
            }
        }
    }

    impl Default for CurlTransport {
        fn default() -> Self {
            Self::new(TransportOptions::CURL.timeout)
        }
    }

    impl Transport for CurlTransport {
        fn post(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, ApiError> {
            post_form(&self.agent, url, fields)
        }
    }

    /// Status codes are data here, so ureq must not turn 4xx/5xx into `Err`.
    /// Running out of redirect hops returns the last 3xx response.
    fn agent(options: TransportOptions) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(options.timeout)
            .max_redirects(options.max_redirects)
            .max_redirects_will_error(false)
            .build()
            .new_agent()
    }

    fn post_form(
        agent: &ureq::Agent,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<HttpResponse, ApiError> {
        log::trace!("POST {url}");
        let mut response = agent
            .post(url)
            .send_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        log::trace!("POST {url} -> {status} ({} bytes)", body.len());

        Ok(HttpResponse { status, body })
    }

}
