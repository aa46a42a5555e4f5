use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use mcenoc_sroute::routing::extraction::{replay,round_trip_failures};
use mcenoc_sroute::routing::{PermutationDecomposer,RouteBitExtractor};
use mcenoc_sroute::topology::wiring::StagePlan;
use mcenoc_sroute::{new_static_routing,route_request,Endpoint,HeaderEncoding,NetworkDescription,PermutationRequest,RouteError};

const NETWORK: &str = "\\node[BP=8, BN=2, BM=2, BL=2, name=s] (butterfly) {};\n\\draw (0,0) -- (1,0);\n";

#[test]
fn identity_simulates_straight_through()
{
	let description = NetworkDescription::parse(NETWORK).unwrap();
	let topology = &description.parameters;
	let request = PermutationRequest::new((0..8).collect(),(0..8).collect(),8).unwrap();
	let routing = new_static_routing("benes",HeaderEncoding::Crossing).unwrap();
	let routed = route_request(routing.as_ref(),&request,topology).unwrap();
	let table = routed.table.unwrap();
	assert!(table.iter().all(|(_,_,config)|config.cross_inputs.is_empty() && config.cross_outputs.is_empty()));
	let plan = StagePlan::new(8);
	for (port,header) in routed.headers.iter()
	{
		assert!(header.bits().iter().all(|&bit|!bit));
		assert_eq!(replay(&plan,HeaderEncoding::Crossing,port,header),port);
	}
}

#[test]
fn full_reversal_of_four_ports()
{
	let request = PermutationRequest::parse(&["0--3","1--2","2--1","3--0"],4).unwrap();
	let table = PermutationDecomposer::decompose(&request);
	let levels:BTreeSet<usize> = table.iter().map(|(level,_,_)|level).collect();
	assert_eq!(levels,BTreeSet::from([0,1]));
	let topology = mcenoc_sroute::TopologyParameters::from_ports(4,2).unwrap();
	let extractor = RouteBitExtractor::new(&table,&topology).unwrap();
	let headers = extractor.extract();
	assert!(round_trip_failures(extractor.plan(),HeaderEncoding::Crossing,&request,&headers).is_empty());
}

#[test]
fn conflicting_sources_are_named()
{
	let error = PermutationRequest::new(vec![0,0,1,2],vec![0,1,2,3],8).unwrap_err();
	match error
	{
		RouteError::DuplicateId{side,ids} =>
		{
			assert_eq!(side,Endpoint::Source);
			assert_eq!(ids,vec![0]);
		},
		other => panic!("unexpected {}",other),
	}
}

#[test]
fn destinations_out_of_range()
{
	let error = PermutationRequest::parse(&["0--1","1--9"],8).unwrap_err();
	assert!(matches!(error,RouteError::OutOfRangeId{side:Endpoint::Destination,id:9,ports:8}));
	assert!(error.to_string().contains('9'));
}

#[test]
fn headers_share_the_declared_width()
{
	let mut rng = StdRng::seed_from_u64(2017);
	for (ports,stages) in [(2,0),(4,1),(8,2),(32,4),(128,6)]
	{
		let line = format!("\\node[BP={}, BN=2, BM=2, BL={}]",ports,stages);
		let description = NetworkDescription::parse(&line).unwrap();
		let topology = &description.parameters;
		assert_eq!(topology.header_bits(),2*stages+1);
		for encoding in [HeaderEncoding::Crossing,HeaderEncoding::OutputSelect]
		{
			let request = PermutationRequest::random(ports,&mut rng);
			let routed = new_static_routing("benes",encoding).unwrap().route(&request,topology).unwrap();
			assert_eq!(routed.headers.len(),ports);
			assert!(routed.headers.iter().all(|(_,header)|header.len()==topology.header_bits()));
			assert!(round_trip_failures(&StagePlan::new(ports),encoding,&request,&routed.headers).is_empty());
		}
	}
}

#[test]
fn sorted_mode_on_the_same_fabric()
{
	let description = NetworkDescription::parse(NETWORK).unwrap();
	let request = PermutationRequest::parse(&["1--0","0--1"],8).unwrap();
	let routing = new_static_routing("sorted",HeaderEncoding::Crossing).unwrap();
	let routed = routing.route(&request,&description.parameters).unwrap();
	assert_eq!(routed.headers.get(1).unwrap().to_string(),"00000");
	assert_eq!(routed.headers.get(0).unwrap().to_string(),"10001");
}
