use std::fmt;

/// One side of the bridge: a filesystem root plus its path syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
	/// The side the tool talking to our stdin/stdout lives in.
	Local,
	/// The side the spawned subprocess lives in.
	Remote,
}

impl Namespace {
	pub fn as_str(&self) -> &'static str {
		match self {
			Namespace::Local => "local",
			Namespace::Remote => "remote",
		}
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The direction a pump moves lines in.
///
/// Determines which namespace strings are read from and which they are
/// translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	LocalToRemote,
	RemoteToLocal,
}

impl Direction {
	/// Namespace the lines originate from.
	pub fn source(&self) -> Namespace {
		match self {
			Direction::LocalToRemote => Namespace::Local,
			Direction::RemoteToLocal => Namespace::Remote,
		}
	}

	/// Namespace paths are translated into.
	pub fn target(&self) -> Namespace {
		match self {
			Direction::LocalToRemote => Namespace::Remote,
			Direction::RemoteToLocal => Namespace::Local,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Direction::LocalToRemote => "local->remote",
			Direction::RemoteToLocal => "remote->local",
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_direction_namespaces() {
		assert_eq!(Direction::LocalToRemote.source(), Namespace::Local);
		assert_eq!(Direction::LocalToRemote.target(), Namespace::Remote);
		assert_eq!(Direction::RemoteToLocal.source(), Namespace::Remote);
		assert_eq!(Direction::RemoteToLocal.target(), Namespace::Local);
	}

	#[test]
	fn test_display() {
		assert_eq!(Direction::LocalToRemote.to_string(), "local->remote");
		assert_eq!(Namespace::Remote.to_string(), "remote");
	}
}
