use std::env;
use std::process;

use getopts::{Matches,Options};
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error,info};
use tracing_subscriber::EnvFilter;

use mcenoc_sroute::annotate::annotate_file;
use mcenoc_sroute::routing::extraction::round_trip_failures;
use mcenoc_sroute::routing::RearrangeableRouting;
use mcenoc_sroute::topology::wiring::StagePlan;
use mcenoc_sroute::{new_static_routing,route_request,HeaderEncoding,NetworkDescription,PermutationRequest,RouteError,StaticRouting,TopologyParameters};

fn print_usage(program:&str, opts:&Options)
{
	let brief = format!("Usage: {} [options] <network.tikz> [<src--dst>...]\n       {} [options] --ports=<n> [<src--dst>...]",program,program);
	print!("{}",opts.usage(&brief));
}

fn numeric_option<T:std::str::FromStr>(matches:&Matches, name:&str) -> Result<Option<T>,RouteError>
{
	match matches.opt_str(name)
	{
		None => Ok(None),
		Some(text) => text.parse::<T>().map(Some).map_err(|_|RouteError::InvalidOption(format!("--{}={}",name,text))),
	}
}

///Route `trials` random permutations, verifying every header by replay.
fn check(topology:&TopologyParameters, encoding:HeaderEncoding, trials:u64, rng:&mut StdRng) -> Result<(),RouteError>
{
	let routing = RearrangeableRouting::new(encoding);
	let plan = StagePlan::new(topology.ports);
	let bar = ProgressBar::new(trials);
	let mut failed = 0;
	for _ in 0..trials
	{
		let request = PermutationRequest::random(topology.ports,rng);
		let routed = routing.route(&request,topology)?;
		if !round_trip_failures(&plan,encoding,&request,&routed.headers).is_empty()
		{
			failed += 1;
		}
		bar.inc(1);
	}
	bar.finish_with_message("done");
	if failed>0
	{
		error!(failed,trials,"some permutations were misrouted");
	}
	else
	{
		info!(trials,"every permutation routed correctly");
	}
	Ok(())
}

fn run(args:&[String]) -> Result<(),RouteError>
{
	let program = args.first().map(String::as_str).unwrap_or("mcenoc-sroute");
	let mut opts = Options::new();
	opts.optflag("h","help","Print this help message.");
	opts.optopt("a","annotate","Output coloured routes.","FILE.tikz");
	opts.optflag("p","print","Print routing bits for each port.");
	opts.optopt("m","mode","Routing to use: benes (default) or sorted.","NAME");
	opts.optflag("","output-select","Headers select switch outputs instead of crossings.");
	opts.optopt("n","ports","Number of ports, instead of a network file.","N");
	opts.optopt("s","midswitches","Number of middle-stage switches when using --ports [default: ports/2].","S");
	opts.optopt("","seed","Seed for the random route.","SEED");
	opts.optopt("","check","Route TRIALS random permutations and verify them.","TRIALS");
	let matches = opts.parse(args.get(1..).unwrap_or(&[])).map_err(|failure|RouteError::InvalidOption(failure.to_string()))?;
	if matches.opt_present("help")
	{
		print_usage(program,&opts);
		return Ok(());
	}

	let mut free = matches.free.clone();
	let description = match numeric_option::<usize>(&matches,"ports")?
	{
		Some(ports) =>
		{
			let middle_switches = numeric_option::<usize>(&matches,"midswitches")?.unwrap_or(ports/2);
			NetworkDescription{
				parameters: TopologyParameters::from_ports(ports,middle_switches)?,
				body: String::new(),
			}
		},
		None =>
		{
			if free.is_empty()
			{
				print_usage(program,&opts);
				return Err(RouteError::InvalidOption("no network description given".to_string()));
			}
			NetworkDescription::from_file(free.remove(0))?
		},
	};
	let topology = &description.parameters;
	let encoding = if matches.opt_present("output-select") { HeaderEncoding::OutputSelect } else { HeaderEncoding::Crossing };
	let mut rng = match numeric_option::<u64>(&matches,"seed")?
	{
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	};

	if let Some(trials) = numeric_option::<u64>(&matches,"check")?
	{
		return check(topology,encoding,trials,&mut rng);
	}

	let routing:Box<dyn StaticRouting> = new_static_routing(matches.opt_str("mode").as_deref().unwrap_or("benes"),encoding)?;
	let request = if free.is_empty() {
		PermutationRequest::random(topology.ports,&mut rng)
	} else {
		PermutationRequest::parse(&free,topology.ports)?
	};
	let routed = route_request(routing.as_ref(),&request,topology)?;

	if let Some(path) = matches.opt_str("annotate")
	{
		match routed.table
		{
			Some(ref table) => annotate_file(&path,&description.body,&StagePlan::new(topology.ports),table)?,
			None => error!(routing=routing.name(),"the routing computes no switch settings to annotate"),
		}
	}
	if matches.opt_present("print")
	{
		println!("Route bits per port:");
		let digits = topology.ports.saturating_sub(1).to_string().len();
		for (port,header) in routed.headers.iter()
		{
			println!("{:>width$}: {}",port,header,width=digits);
		}
	}
	Ok(())
}

fn main()
{
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_|EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();
	let args:Vec<String> = env::args().collect();
	if let Err(error) = run(&args)
	{
		error!("{}",error);
		process::exit(1);
	}
}
