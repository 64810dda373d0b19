/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @Description  : 计算图节点：`NodeHandle`（图中的节点容器）+ `raw_node`（各类节点的具体计算）
 */

mod node_handle;
pub(in crate::nn) mod raw_node;

pub(in crate::nn) use node_handle::NodeHandle;
pub use node_handle::NodeId;
pub(in crate::nn) use raw_node::{InputKind, NodeType, TraitNode};
