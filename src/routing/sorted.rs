use itertools::Itertools;
use tracing::debug;

use crate::error::RouteError;
use crate::header::{HeaderSet,RouteHeader};
use crate::permutation::PermutationRequest;
use crate::routing::{check_ports,RoutedRequest,StaticRouting};
use crate::topology::TopologyParameters;

/**
Single pass header assignment for fabrics with a unique path per permutation.

The pairs are sorted by destination and numbered in that order. The `i`-th pair gets the header `group ‖ i`, with `i` in the low `log2(N)` bits and the middle switch group in the bits above. `group` restarts at 0 at the beginning of each block of `N/2^middle_bits` pairs and advances by `block/2^middle_bits`, modulo the block, after every assignment.

No contention is resolved: the caller must only use it where two sources can never compete for a switch output.
**/
#[derive(Clone,Copy,Debug,Default)]
pub struct SimpleSortRouter;

impl StaticRouting for SimpleSortRouter
{
	fn name(&self) -> &'static str
	{
		"sorted"
	}

	fn route(&self, request:&PermutationRequest, topology:&TopologyParameters) -> Result<RoutedRequest,RouteError>
	{
		check_ports(request,topology)?;
		let port_bits = topology.port_bits();
		let middle_bits = topology.middle_bits;
		if middle_bits>port_bits
		{
			return Err(RouteError::UnsupportedTopology(format!("{} middle bits exceed the {} address bits",middle_bits,port_bits)));
		}
		let block = topology.ports >> middle_bits;
		let skip = block >> middle_bits;
		let width = topology.header_bits();
		let needed = 2*port_bits - middle_bits;
		if width<needed
		{
			return Err(RouteError::UnsupportedTopology(format!("headers of {} bits cannot hold {} bits of group and index",width,needed)));
		}
		debug!(block,skip,width,"sorted assignment");
		let mut headers = HeaderSet::new(width);
		let mut group = 0;
		for (index,(source,_destination)) in request.pairs().sorted_by_key(|&(_,destination)|destination).enumerate()
		{
			if index % block == 0
			{
				group = 0;
			}
			let value = ((group as u64) << port_bits) | index as u64;
			headers.insert(source,RouteHeader::from_value(value,width));
			group = (group+skip) % block;
		}
		Ok(RoutedRequest{headers,table:None})
	}
}
