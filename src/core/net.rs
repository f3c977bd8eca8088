// src/core/net.rs
// HTTP/1.0 GET over plain TCP. HTTP/1.0 makes the server close the
// connection at the end, so there is no chunked transfer to undo.
// There is no TLS here: an https:// target, first or after a redirect,
// is reported instead of fetched.

use std::{
    error::Error,
    fmt,
    io::{Read, Write},
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::config::consts::USER_AGENT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// `scheme://host[:port]/path?query`, nothing fancier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl HttpUrl {
    pub fn parse(url: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let (scheme, rest) = if let Some(rest) = url.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else if let Some(rest) = url.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else {
            return Err(format!("Unsupported URL (http or https only): {url}").into());
        };

        // fragments never go on the wire
        let rest = rest.split('#').next().unwrap_or("");
        let (authority, path) = match rest.find(['/', '?']) {
            Some(i) if rest[i..].starts_with('/') => (&rest[..i], s!(&rest[i..])),
            Some(i) => (&rest[..i], join!("/", &rest[i..])),
            None => (rest, s!("/")),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => (h, p.parse::<u16>().map_err(|_| format!("Bad port in URL: {url}"))?),
            None => (authority, scheme.default_port()),
        };
        if host.is_empty() {
            return Err(format!("Missing host in URL: {url}").into());
        }

        Ok(Self { scheme, host: s!(host), port, path })
    }

    /// Resolve a `Location` header against this URL: absolute,
    /// protocol-relative (`//host/x`), absolute-path (`/x`) or relative (`x`).
    pub fn join(&self, location: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let location = location.trim();
        if has_scheme(location) {
            return Self::parse(location);
        }
        if let Some(rest) = location.strip_prefix("//") {
            return Self::parse(&format!("{}://{rest}", self.scheme.as_str()));
        }

        let location = location.split('#').next().unwrap_or("");
        let path = if location.starts_with('/') {
            resolve_path("/", location)
        } else {
            resolve_path(&self.path, location)
        };
        Ok(Self { path, ..self.clone() })
    }
}

/// `http:`, `https:`, `ftp:` … anything `[A-Za-z][A-Za-z0-9+.-]*:` up front.
fn has_scheme(s: &str) -> bool {
    match s.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Merge `rel` onto the directory of `base` and drop `.`/`..` segments.
fn resolve_path(base: &str, rel: &str) -> String {
    let base = base.split('?').next().unwrap_or("/");
    let dir = match base.rfind('/') {
        Some(i) => &base[..=i],
        None => "/",
    };
    let (rel_path, query) = match rel.find('?') {
        Some(i) => (&rel[..i], &rel[i..]),
        None => (rel, ""),
    };

    let merged = if rel_path.starts_with('/') { s!(rel_path) } else { join!(dir, rel_path) };
    let mut segs: Vec<&str> = Vec::new();
    let mut trailing_dir = false;
    for seg in merged.split('/').skip(1) {
        trailing_dir = matches!(seg, "." | "..");
        match seg {
            "." => {}
            ".." => { segs.pop(); }
            s => segs.push(s),
        }
    }
    if trailing_dir {
        segs.push("");
    }
    join!("/", &segs.join("/"), query)
}

impl fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == self.scheme.default_port() {
            write!(f, "{}://{}{}", self.scheme.as_str(), self.host, self.path)
        } else {
            write!(f, "{}://{}:{}{}", self.scheme.as_str(), self.host, self.port, self.path)
        }
    }
}

/// The server answered, but not with 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub status: u16,
    pub reason: String,
    pub url: String,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP error: {} {} ({})", self.status, self.reason, self.url)
    }
}

impl Error for HttpStatusError {}

/// The target, or a redirect along the way, needs TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsRequired {
    /// Where the redirect came from; `None` when the starting URL is https.
    pub from: Option<String>,
    pub url: String,
}

impl fmt::Display for TlsRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(
                f,
                "{from} redirected to {}, which needs TLS; only plain http:// can be fetched",
                self.url
            ),
            None => write!(f, "{} needs TLS; only plain http:// can be fetched", self.url),
        }
    }
}

impl Error for TlsRequired {}

/// One parsed response. Header names are lowercased.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// GET `url`, following plain-http redirects, and return the body.
/// A final status outside 2xx is an `HttpStatusError`; an https hop is
/// `TlsRequired`.
pub fn http_get(url: &str, timeout: Duration, max_redirects: usize) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut target = HttpUrl::parse(url)?;
    if target.scheme == Scheme::Https {
        return Err(Box::new(TlsRequired { from: None, url: target.to_string() }));
    }
    let mut hops = 0usize;

    loop {
        log::debug!("GET {target}");
        let resp = request(&target, timeout)?;
        log::info!("{} {} <- {target}", resp.status, resp.reason);

        match resp.status {
            200..=299 => return Ok(resp.body),
            301 | 302 | 303 | 307 | 308 if hops < max_redirects => {
                let location = resp
                    .header("location")
                    .ok_or_else(|| format!("Redirect without Location from {target}"))?;
                let next = target.join(location)?;
                if next.scheme == Scheme::Https {
                    return Err(Box::new(TlsRequired {
                        from: Some(target.to_string()),
                        url: next.to_string(),
                    }));
                }
                target = next;
                hops += 1;
            }
            status => {
                return Err(Box::new(HttpStatusError {
                    status,
                    reason: resp.reason,
                    url: target.to_string(),
                }));
            }
        }
    }
}

/// One plain-http request, one response. No redirects.
pub fn request(url: &HttpUrl, timeout: Duration) -> Result<Response, Box<dyn Error + Send + Sync>> {
    if url.scheme != Scheme::Http {
        return Err(Box::new(TlsRequired { from: None, url: url.to_string() }));
    }
    let addr = (url.host.as_str(), url.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| format!("Could not resolve {}", url.host))?;

    let mut s = TcpStream::connect_timeout(&addr, timeout)?;
    s.set_read_timeout(Some(timeout))?;
    s.set_write_timeout(Some(timeout))?;

    let req = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\nAccept: text/html\r\nConnection: close\r\n\r\n",
        url.path, url.host, USER_AGENT
    );
    s.write_all(req.as_bytes())?;
    s.flush()?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf)?;
    parse_response(&String::from_utf8_lossy(&buf))
}

/// Split a raw HTTP/1.x response into status, headers and body.
pub fn parse_response(raw: &str) -> Result<Response, Box<dyn Error + Send + Sync>> {
    let (head, body) = match raw.find("\r\n\r\n") {
        Some(i) => (&raw[..i], &raw[i + 4..]),
        None => return Err("Malformed HTTP response".into()),
    };

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or("");
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(format!("Malformed status line: {status_line}").into());
    }
    let status: u16 = parts
        .next()
        .and_then(|c| c.parse().ok())
        .ok_or_else(|| format!("Malformed status line: {status_line}"))?;
    let reason = s!(parts.next().unwrap_or("").trim());

    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), s!(v.trim())))
        .collect();

    Ok(Response { status, reason, headers, body: s!(body) })
}
