/*!

The fixed wiring of a Beneš fabric of 2x2 switches.

With `N=2^k` ports the fabric has `2k-1` stages of `N/2` switches. Traversal position `t` visits the stage at recursion level `k-1-t` for the first `k` positions (the expansion half, ending in the middle stage at level 0) and level `t-k+1` afterwards (the contraction half). At level `l` the switches are split into groups of `2^l` consecutive switches, each group being the first (or last) stage of a sub-network of `2^(l+1)` ports.

Between stages the ports are remapped inside blocks of `2^(l+1)` ports. Leaving an expansion stage a token takes the inverse perfect shuffle, so the upper outputs of the group feed the first sub-network and the lower outputs the second one. Entering a contraction stage it takes the perfect shuffle, which interleaves the outputs of both sub-networks back.

*/

///Perfect shuffle of `port` inside its block of `step` ports.
pub fn shuffle(port:usize, step:usize) -> usize
{
	let doubled = (port % step) * 2;
	doubled % step + doubled / step + (port / step) * step
}

///Inverse of [shuffle].
pub fn unshuffle(port:usize, step:usize) -> usize
{
	let local = port % step;
	local / 2 + (local & 1) * (step / 2) + (port / step) * step
}

///Whether a stage reads the input-side or the output-side crossing sets.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Side
{
	Input,
	Output,
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct TraversalStage
{
	///Position in the traversal, starting at 0.
	pub index: usize,
	///Recursion level of the switches of this stage. Groups have `2^level` switches.
	pub level: usize,
	pub side: Side,
}

impl TraversalStage
{
	///The switch group and the position inside it of the switch holding `port`.
	pub fn locate(&self, port:usize) -> (usize,usize)
	{
		let switch = port / 2;
		(switch >> self.level, switch & ((1 << self.level) - 1))
	}
}

///The sequence of stages a token crosses, with the wiring between them.
#[derive(Clone,Debug)]
pub struct StagePlan
{
	ports: usize,
	stages: Vec<TraversalStage>,
}

impl StagePlan
{
	pub fn new(ports:usize) -> StagePlan
	{
		let k = ports.trailing_zeros() as usize;
		let mut stages = Vec::with_capacity(2*k);
		if k>0
		{
			let expansion = (0..k).rev().map(|level|(level,Side::Input));
			let contraction = (1..k).map(|level|(level,Side::Output));
			for (index,(level,side)) in expansion.chain(contraction).enumerate()
			{
				stages.push(TraversalStage{index,level,side});
			}
		}
		StagePlan{ports,stages}
	}

	pub fn ports(&self) -> usize
	{
		self.ports
	}

	pub fn stages(&self) -> &[TraversalStage]
	{
		&self.stages
	}

	pub fn len(&self) -> usize
	{
		self.stages.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.stages.is_empty()
	}

	///Size of the port blocks remapped next to a stage of the given level, capped at the port count.
	pub fn block(&self, level:usize) -> usize
	{
		(2usize << level).min(self.ports)
	}

	///The wiring a token takes to reach `stage` from the previous one.
	pub fn enter(&self, stage:&TraversalStage, port:usize) -> usize
	{
		match stage.side
		{
			Side::Input => port,
			Side::Output => shuffle(port,self.block(stage.level)),
		}
	}

	///The wiring a token takes after leaving `stage`.
	pub fn leave(&self, stage:&TraversalStage, port:usize) -> usize
	{
		match stage.side
		{
			Side::Input if stage.level>0 => unshuffle(port,self.block(stage.level)),
			_ => port,
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn shuffle_interleaves_halves()
	{
		let shuffled:Vec<usize> = (0..8).map(|p|shuffle(p,8)).collect();
		assert_eq!(shuffled,vec![0,2,4,6,1,3,5,7]);
		let shuffled:Vec<usize> = (0..8).map(|p|shuffle(p,4)).collect();
		assert_eq!(shuffled,vec![0,2,1,3,4,6,5,7]);
		for step in [2,4,8,16]
		{
			for port in 0..32
			{
				assert_eq!(unshuffle(shuffle(port,step),step),port);
			}
		}
	}

	#[test]
	fn plan_of_eight_ports()
	{
		let plan = StagePlan::new(8);
		let levels:Vec<(usize,Side)> = plan.stages().iter().map(|s|(s.level,s.side)).collect();
		assert_eq!(levels,vec![(2,Side::Input),(1,Side::Input),(0,Side::Input),(1,Side::Output),(2,Side::Output)]);
		assert_eq!(plan.block(2),8);
		assert_eq!(plan.block(5),8);
		assert!(StagePlan::new(1).is_empty());
		assert_eq!(StagePlan::new(2).len(),1);
	}

	#[test]
	fn locate_switch_groups()
	{
		let stage = TraversalStage{index:1,level:1,side:Side::Input};
		assert_eq!(stage.locate(0),(0,0));
		assert_eq!(stage.locate(3),(0,1));
		assert_eq!(stage.locate(5),(1,0));
		let middle = TraversalStage{index:2,level:0,side:Side::Input};
		assert_eq!(middle.locate(7),(3,0));
	}
}
