use clap::Parser;

use crate::sys::NodeID;

/// Region admin node of a cache cluster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CmdArgs {
    /// Id of this node in `files/node_config.yaml`
    pub this_id: NodeID,
    /// Directory holding `files/node_config.yaml`
    pub files_dir: String,
}
