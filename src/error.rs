/*!

The error type shared by every stage of the router.

All the variants except `Io` are precondition failures. They are detected before any routing computation begins; the decomposition and the header extraction have no failure modes of their own once the request has been validated.

*/

use std::fmt;

use itertools::Itertools;

///The side of a request an offending id belongs to.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Endpoint
{
	Source,
	Destination,
}

impl fmt::Display for Endpoint
{
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			Endpoint::Source => write!(f,"source"),
			Endpoint::Destination => write!(f,"destination"),
		}
	}
}

#[derive(Debug,thiserror::Error)]
pub enum RouteError
{
	///Some ids appear more than once on one side of the request. `ids` is the complete set of repeated values, sorted.
	#[error("duplicate {side} id(s): {{{}}}", .ids.iter().join(", "))]
	DuplicateId{
		side: Endpoint,
		ids: Vec<i64>,
	},
	///An id lies outside `[0,ports)`.
	#[error("{side} id {id} outside port range [0, {ports})")]
	OutOfRangeId{
		side: Endpoint,
		id: i64,
		ports: usize,
	},
	///The declaration line could not be decoded into the four topology integers.
	#[error("malformed topology declaration: {0}")]
	MalformedTopology(String),
	///The topology is well formed but the selected router cannot build headers for it.
	#[error("unsupported topology: {0}")]
	UnsupportedTopology(String),
	#[error("unknown routing '{0}'")]
	UnknownRouting(String),
	///A route token that is not of the form `src--dst`.
	#[error("malformed route request '{0}'")]
	MalformedRequest(String),
	#[error("invalid command line: {0}")]
	InvalidOption(String),
	#[error("source and destination lists differ in length ({sources} vs {destinations})")]
	LengthMismatch{
		sources: usize,
		destinations: usize,
	},
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
}
