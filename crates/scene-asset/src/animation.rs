/// A keyed vector value. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorKey {
    pub time: f64,
    pub value: [f32; 3],
}

/// A keyed rotation, stored `(x, y, z, w)`. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatKey {
    pub time: f64,
    pub value: [f32; 4],
}

/// Everything one animation does to one node. Key arrays a channel does
/// not animate are empty; a node with a static transform component and
/// no sampler for it gets a single key at time zero instead.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeChannel {
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

/// One output animation.
///
/// `duration` is the latest key time across all channels, in the same
/// unit as the keys (milliseconds). `ticks_per_second` is 0: key times
/// are already scaled, there is no further tick conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: Option<String>,
    pub channels: Vec<NodeChannel>,
    pub duration: f64,
    pub ticks_per_second: f64,
}
