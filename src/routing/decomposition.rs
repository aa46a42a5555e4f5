/*!

The looping algorithm: decomposition of an arbitrary permutation into per-stage switch settings.

A Beneš network of `2^(l+1)` ports is a column of `2^l` input switches, two sub-networks of `2^l` ports and a column of `2^l` output switches. Routing a permutation through it amounts to 2-colouring its entries so that the two entries leaving each input switch get different colours, and so do the two entries reaching each output switch. Colour A goes through the upper sub-network and colour B through the lower one. Seen with ids halved, the entries are the edges of a 2-regular bipartite multigraph between input switches and output switches, so such a colouring always exists and is found by chasing its cycles.

The colouring is made canonical so that the same request always yields the same table:

* Double edges (both entries joining the same input switch and the same output switch) are split first, in ascending order of their cells, giving A to the entry with the even destination. At the middle stage this makes the input-side setting of the single switch exact.
* Every chase starts at the lowest output switch with an uncoloured entry, giving A to its entry with the lower destination.

*/

use std::collections::{BTreeMap,BTreeSet};

use tracing::{debug,trace};

use crate::permutation::{PermutationEntry,PermutationRequest};
use crate::topology::wiring::{Side,TraversalStage};

///Settings of one group of switches. Positions are relative to the first switch of the group.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct SwitchConfig
{
	///Switches that must cross when the group is an input column.
	pub cross_inputs: BTreeSet<usize>,
	///Switches that must cross when the group is an output column.
	pub cross_outputs: BTreeSet<usize>,
}

impl SwitchConfig
{
	pub fn crosses(&self, side:Side, relative_switch:usize) -> bool
	{
		match side
		{
			Side::Input => self.cross_inputs.contains(&relative_switch),
			Side::Output => self.cross_outputs.contains(&relative_switch),
		}
	}
}

///Switch settings keyed by `(level,group)`. At level `l` there are `N/2^(l+1)` groups of `2^l` switches.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct SwitchConfigTable
{
	configs: BTreeMap<(usize,usize),SwitchConfig>,
}

impl SwitchConfigTable
{
	pub fn insert(&mut self, level:usize, group:usize, config:SwitchConfig)
	{
		self.configs.insert((level,group),config);
	}

	pub fn get(&self, level:usize, group:usize) -> Option<&SwitchConfig>
	{
		self.configs.get(&(level,group))
	}

	///Whether the switch holding `port` at `stage` crosses.
	pub fn crosses(&self, stage:&TraversalStage, port:usize) -> bool
	{
		let (group,relative) = stage.locate(port);
		self.get(stage.level,group).map(|config|config.crosses(stage.side,relative)).unwrap_or(false)
	}

	///Entries in ascending `(level,group)` order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item=(usize,usize,&SwitchConfig)> + '_
	{
		self.configs.iter().map(|(&(level,group),config)|(level,group,config))
	}

	pub fn groups_at(&self, level:usize) -> impl Iterator<Item=usize> + '_
	{
		self.configs.range((level,0)..=(level,usize::MAX)).map(|(&(_,group),_)|group)
	}

	pub fn len(&self) -> usize
	{
		self.configs.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.configs.is_empty()
	}

	///Whether the table covers a fabric of `ports` ports exactly: at every level the groups are `0..N/2^(l+1)`, each set naming at most `2^l` switches of its group, and the middle stage never needs an output-side decision.
	pub fn is_partition_of(&self, ports:usize) -> bool
	{
		let k = ports.trailing_zeros() as usize;
		if k==0
		{
			return self.is_empty();
		}
		let mut expected = 0;
		for level in 0..k
		{
			let groups = ports >> (level+1);
			if !self.groups_at(level).eq(0..groups)
			{
				return false;
			}
			expected += groups;
		}
		expected==self.len() && self.iter().all(|(level,_,config)|{
			let size = 1usize << level;
			config.cross_inputs.iter().chain(config.cross_outputs.iter()).all(|&s|s<size)
				&& config.cross_inputs.len()<=size && config.cross_outputs.len()<=size
				&& (level>0 || config.cross_outputs.is_empty())
		})
	}
}

///A pending piece of the decomposition.
struct SubPermutation
{
	level: usize,
	group: usize,
	entries: Vec<PermutationEntry>,
}

#[derive(Clone,Copy,Debug,Default)]
pub struct PermutationDecomposer;

impl PermutationDecomposer
{
	///Build the switch settings for the whole fabric. A partial request is completed first.
	pub fn decompose(request:&PermutationRequest) -> SwitchConfigTable
	{
		let mut table = SwitchConfigTable::default();
		let ports = request.ports();
		if ports<2
		{
			return table;
		}
		let top = ports.trailing_zeros() as usize - 1;
		let mut pending = vec![SubPermutation{level:top,group:0,entries:request.completed().entries()}];
		while let Some(SubPermutation{level,group,entries}) = pending.pop()
		{
			let (upper,lower) = PermutationDecomposer::split(&entries);
			let config = SwitchConfig{
				cross_inputs: upper.iter().filter(|e|e.source&1==1).map(|e|e.source/2).collect(),
				cross_outputs: upper.iter().filter(|e|e.destination&1==1).map(|e|e.destination/2).collect(),
			};
			trace!(level,group,upper=?upper.iter().map(|e|e.physical_ports()).collect::<Vec<_>>(),lower=?lower.iter().map(|e|e.physical_ports()).collect::<Vec<_>>(),"split");
			table.insert(level,group,config);
			if level>0
			{
				pending.push(SubPermutation{level:level-1,group:2*group+1,entries:lower.iter().map(PermutationEntry::halved).collect()});
				pending.push(SubPermutation{level:level-1,group:2*group,entries:upper.iter().map(PermutationEntry::halved).collect()});
			}
		}
		debug!(groups=table.len(),"decomposed permutation");
		table
	}

	///2-colour the entries of one sub-network, returning the A (upper) and B (lower) halves with their ids unchanged.
	///Assumes a valid permutation; otherwise some entries may be left out.
	pub fn split(entries:&[PermutationEntry]) -> (Vec<PermutationEntry>,Vec<PermutationEntry>)
	{
		let cells = (entries.len()+1)/2;
		let mut upper = Vec::with_capacity(cells);
		let mut lower = Vec::with_capacity(cells);
		let mut assigned = vec![false;entries.len()];

		let mut edges:BTreeMap<(usize,usize),Vec<usize>> = BTreeMap::new();
		for (index,entry) in entries.iter().enumerate()
		{
			edges.entry((entry.source/2,entry.destination/2)).or_default().push(index);
		}
		for indices in edges.values().filter(|indices|indices.len()==2)
		{
			let (a,b) = if entries[indices[0]].destination < entries[indices[1]].destination { (indices[0],indices[1]) } else { (indices[1],indices[0]) };
			upper.push(entries[a]);
			lower.push(entries[b]);
			assigned[a] = true;
			assigned[b] = true;
		}

		let mut by_source = vec![Vec::new();cells];
		let mut by_destination = vec![Vec::new();cells];
		for (index,entry) in entries.iter().enumerate()
		{
			if !assigned[index]
			{
				by_source[entry.source/2].push(index);
				by_destination[entry.destination/2].push(index);
			}
		}
		//The free entry of a cell with the lowest destination, marking it as taken.
		let take = |cell:&Vec<usize>, assigned:&mut Vec<bool>| -> Option<usize> {
			let index = cell.iter().copied().filter(|&i|!assigned[i]).min_by_key(|&i|entries[i].destination)?;
			assigned[index] = true;
			Some(index)
		};

		let mut start = 0;
		while start<cells
		{
			if by_destination[start].iter().all(|&i|assigned[i])
			{
				start += 1;
				continue;
			}
			let mut cell = start;
			while let Some(a) = take(&by_destination[cell],&mut assigned)
			{
				upper.push(entries[a]);
				let b = match take(&by_source[entries[a].source/2],&mut assigned)
				{
					Some(b) => b,
					None => break,
				};
				lower.push(entries[b]);
				cell = entries[b].destination/2;
			}
		}
		(upper,lower)
	}
}
