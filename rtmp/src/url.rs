use std::fmt;

/// A parsed `rtmp[s]://host[:port]/app/stream_name[?query]` dial target, used
/// by the client role to seed a connect. The server role never parses URLs —
/// it only ever sees `app`/`stream_name` pairs already split out of decoded
/// AMF command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtmpUrl {
	pub tls: bool,
	pub host: String,
	pub port: u16,
	pub app: String,
	pub stream_name: String,
	pub query: Option<String>,
}

#[derive(Debug)]
pub enum UrlError {
	UnsupportedScheme,
	MissingHost,
	InvalidPort,
	MissingPath,
}

impl fmt::Display for UrlError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnsupportedScheme => write!(f, "unsupported scheme, expected rtmp or rtmps"),
			Self::MissingHost => write!(f, "missing host"),
			Self::InvalidPort => write!(f, "invalid port"),
			Self::MissingPath => write!(f, "missing app/stream_name path"),
		}
	}
}

impl std::error::Error for UrlError {}

impl RtmpUrl {
	pub fn parse(url: &str) -> Result<Self, UrlError> {
		let (scheme, rest) = url.split_once("://").ok_or(UrlError::UnsupportedScheme)?;

		let tls = match scheme {
			"rtmp" => false,
			"rtmps" => true,
			_ => return Err(UrlError::UnsupportedScheme),
		};

		let (authority, path) = rest.split_once('/').ok_or(UrlError::MissingPath)?;
		if authority.is_empty() {
			return Err(UrlError::MissingHost);
		}

		let (host, port) = match authority.split_once(':') {
			Some((host, port)) => {
				let port: u16 = port.parse().map_err(|_| UrlError::InvalidPort)?;
				(host.to_string(), port)
			}
			None => (authority.to_string(), if tls { 443 } else { 1935 }),
		};

		let (path, query) = match path.split_once('?') {
			Some((path, query)) => (path, Some(query.to_string())),
			None => (path, None),
		};

		let (app, stream_name) = path.split_once('/').ok_or(UrlError::MissingPath)?;
		if app.is_empty() || stream_name.is_empty() {
			return Err(UrlError::MissingPath);
		}

		Ok(Self {
			tls,
			host,
			port,
			app: app.to_string(),
			stream_name: stream_name.to_string(),
			query,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_plain() {
		let url = RtmpUrl::parse("rtmp://example.com/live/stream1").unwrap();
		assert_eq!(url.tls, false);
		assert_eq!(url.host, "example.com");
		assert_eq!(url.port, 1935);
		assert_eq!(url.app, "live");
		assert_eq!(url.stream_name, "stream1");
		assert_eq!(url.query, None);
	}

	#[test]
	fn test_parse_tls_custom_port_and_query() {
		let url = RtmpUrl::parse("rtmps://example.com:1936/live/stream1?auth=abc").unwrap();
		assert_eq!(url.tls, true);
		assert_eq!(url.port, 1936);
		assert_eq!(url.app, "live");
		assert_eq!(url.stream_name, "stream1");
		assert_eq!(url.query.as_deref(), Some("auth=abc"));
	}

	#[test]
	fn test_parse_unsupported_scheme() {
		let err = RtmpUrl::parse("http://example.com/live/stream1").unwrap_err();
		assert!(matches!(err, UrlError::UnsupportedScheme));
	}

	#[test]
	fn test_parse_missing_path() {
		let err = RtmpUrl::parse("rtmp://example.com").unwrap_err();
		assert!(matches!(err, UrlError::MissingPath));
	}
}
