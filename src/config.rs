/// Capacity of the per connection line buffers, used for the request line and for each
/// header line.  Longer lines are truncated to `MAX_LINE_SIZE - 1` bytes, the remainder is
/// returned by the next read.
pub const MAX_LINE_SIZE: usize = 512;

/// Maximum number of routes a `Router` accepts.
pub const MAX_ROUTES: usize = 5;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 80;

/// Concurrent connections allowed when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;

/// Construction time settings of a `Server`.
///
/// ```
/// use contlite::config::Config;
///
/// let config = Config::default().with_port(8080).with_max_connections(2);
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.max_connections, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// TCP port the listener is bound to
    pub port: u16,
    /// Number of connection slots.  The connection arriving while all slots are in use is
    /// refused.
    pub max_connections: usize,
}

impl Config {
    /// Construct a config for the given port and slot count
    pub const fn new(port: u16, max_connections: usize) -> Self {
        Self {
            port,
            max_connections,
        }
    }

    /// Replace the port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replace the number of connection slots
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.max_connections == 0 {
            return Err("max_connections must be at least 1");
        }
        if self.max_connections > u16::MAX as usize {
            return Err("max_connections exceeds the slot index range");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_MAX_CONNECTIONS)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::new(80, 0).validate().is_err());
        assert!(Config::new(80, 70_000).validate().is_err());
        assert!(Config::new(80, 1).validate().is_ok());
    }
}
