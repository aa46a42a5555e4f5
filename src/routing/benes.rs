use tracing::debug;

use crate::error::RouteError;
use crate::header::HeaderEncoding;
use crate::permutation::PermutationRequest;
use crate::routing::{check_ports,RoutedRequest,StaticRouting};
use crate::routing::decomposition::PermutationDecomposer;
use crate::routing::extraction::RouteBitExtractor;
use crate::topology::TopologyParameters;

///Routing of arbitrary permutations through a rearrangeable (Beneš) fabric of 2x2 switches.
///The request is decomposed into switch settings by the looping algorithm and the headers are read off a walk of the fabric.
#[derive(Clone,Copy,Debug,Default)]
pub struct RearrangeableRouting
{
	encoding: HeaderEncoding,
}

impl RearrangeableRouting
{
	pub fn new(encoding:HeaderEncoding) -> RearrangeableRouting
	{
		RearrangeableRouting{encoding}
	}
}

impl StaticRouting for RearrangeableRouting
{
	fn name(&self) -> &'static str
	{
		"benes"
	}

	fn route(&self, request:&PermutationRequest, topology:&TopologyParameters) -> Result<RoutedRequest,RouteError>
	{
		check_ports(request,topology)?;
		if !topology.is_binary_benes()
		{
			return Err(RouteError::UnsupportedTopology(format!("{:?} is not a Beneš fabric of 2x2 switches",topology)));
		}
		let table = PermutationDecomposer::decompose(request);
		for (level,group,config) in table.iter().rev()
		{
			debug!(level,group,cross_inputs=?config.cross_inputs,cross_outputs=?config.cross_outputs,"switch group");
		}
		let headers = RouteBitExtractor::new(&table,topology)?.with_encoding(self.encoding).extract();
		Ok(RoutedRequest{
			headers,
			table: Some(table),
		})
	}
}
