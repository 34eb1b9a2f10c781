//! Platform families and their certificate directories.

/// Platform family used to choose the default chain directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Debian,
    RedHat,
    Other,
}

impl PlatformFamily {
    pub fn from_platform(platform: &str) -> Self {
        match platform.trim().to_ascii_lowercase().as_str() {
            "debian" | "ubuntu" => PlatformFamily::Debian,
            "redhat" | "centos" | "fedora" | "scientific" | "amazon" => PlatformFamily::RedHat,
            _ => PlatformFamily::Other,
        }
    }

    pub fn default_chain_dir(&self) -> &'static str {
        match self {
            PlatformFamily::Debian => "/etc/ssl/certs",
            PlatformFamily::RedHat => "/etc/pki/tls/certs",
            PlatformFamily::Other => "/etc",
        }
    }
}

/// Default chain directory for a platform name.
pub fn default_chain_dir(platform: &str) -> &'static str {
    PlatformFamily::from_platform(platform).default_chain_dir()
}
