/*!

Turning a [SwitchConfigTable] into per-port route headers by walking the fabric.

A token entering at each port is followed stage by stage: the wiring takes it to its switch, the table tells whether that switch crosses, and the decision is appended to the token's header. Replaying a header only needs the wiring, so it can be checked against the request independently of the table that produced it.

*/

use tracing::warn;

use crate::error::RouteError;
use crate::header::{HeaderEncoding,HeaderSet,RouteHeader};
use crate::permutation::PermutationRequest;
use crate::routing::decomposition::SwitchConfigTable;
use crate::topology::TopologyParameters;
use crate::topology::wiring::StagePlan;

#[derive(Debug)]
pub struct RouteBitExtractor<'a>
{
	table: &'a SwitchConfigTable,
	plan: StagePlan,
	encoding: HeaderEncoding,
}

impl<'a> RouteBitExtractor<'a>
{
	///Fails with `UnsupportedTopology` unless the parameters describe a Beneš fabric of 2x2 switches.
	pub fn new(table:&'a SwitchConfigTable, topology:&TopologyParameters) -> Result<RouteBitExtractor<'a>,RouteError>
	{
		if !topology.is_binary_benes()
		{
			return Err(RouteError::UnsupportedTopology(format!("{:?} is not a Beneš fabric of 2x2 switches",topology)));
		}
		Ok(RouteBitExtractor{
			table,
			plan: StagePlan::new(topology.ports),
			encoding: HeaderEncoding::default(),
		})
	}

	pub fn with_encoding(self, encoding:HeaderEncoding) -> RouteBitExtractor<'a>
	{
		RouteBitExtractor{encoding,..self}
	}

	pub fn plan(&self) -> &StagePlan
	{
		&self.plan
	}

	///Follow the token entering at `source`. Returns its header and the port it leaves the fabric by.
	pub fn walk(&self, source:usize) -> (RouteHeader,usize)
	{
		let mut header = RouteHeader::new();
		let mut port = source;
		for stage in self.plan.stages()
		{
			port = self.plan.enter(stage,port);
			let crossing = self.table.crosses(stage,port);
			if crossing
			{
				port ^= 1;
			}
			header.push(match self.encoding
			{
				HeaderEncoding::Crossing => crossing,
				HeaderEncoding::OutputSelect => port&1==1,
			});
			port = self.plan.leave(stage,port);
		}
		(header,port)
	}

	///The headers of every port of the fabric.
	pub fn extract(&self) -> HeaderSet
	{
		let mut headers = HeaderSet::new(self.plan.len());
		for source in 0..self.plan.ports()
		{
			let (header,_) = self.walk(source);
			headers.insert(source,header);
		}
		headers
	}
}

///The port reached by following `header` from `source`, reading it with the given encoding.
pub fn replay(plan:&StagePlan, encoding:HeaderEncoding, source:usize, header:&RouteHeader) -> usize
{
	let mut port = source;
	for (stage,&bit) in plan.stages().iter().zip(header.bits())
	{
		port = plan.enter(stage,port);
		port = match encoding
		{
			HeaderEncoding::Crossing => if bit { port^1 } else { port },
			HeaderEncoding::OutputSelect => (port & !1) | bit as usize,
		};
		port = plan.leave(stage,port);
	}
	port
}

///Sources of `request` whose header does not lead to their destination.
pub fn round_trip_failures(plan:&StagePlan, encoding:HeaderEncoding, request:&PermutationRequest, headers:&HeaderSet) -> Vec<usize>
{
	let mut failures = vec![];
	for (source,destination) in request.pairs()
	{
		let reached = headers.get(source).map(|header|replay(plan,encoding,source,header));
		if reached!=Some(destination)
		{
			warn!(source,destination,?reached,"header does not reach its destination");
			failures.push(source);
		}
	}
	failures
}
