/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 参数序列化（save_params/load_params）
 *
 * 参数以“节点名 -> 张量”的形式经`bincode`写入二进制文件，
 * 加载时按名称回填，因此只要建图时参数命名一致即可跨进程恢复。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// 参数文件魔数
const PARAMS_MAGIC: [u8; 4] = *b"TTPR";
/// 参数文件版本
const PARAMS_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ParamsFile {
    magic: [u8; 4],
    version: u32,
    params: BTreeMap<String, Tensor>,
}

impl GraphInner {
    /// 保存所有可训练参数到二进制文件
    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let mut params = BTreeMap::new();
        for id in self.get_trainable_nodes() {
            let node = self.get_node(id)?;
            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("参数{node}没有值"))
            })?;
            params.insert(node.name().to_string(), value.clone());
        }

        let file = File::create(path.as_ref())
            .map_err(|e| GraphError::Serialization(format!("无法创建参数文件: {e}")))?;
        let count = params.len();
        let content = ParamsFile {
            magic: PARAMS_MAGIC,
            version: PARAMS_VERSION,
            params,
        };
        bincode::serialize_into(BufWriter::new(file), &content)
            .map_err(|e| GraphError::Serialization(format!("写入参数失败: {e}")))?;
        debug!(graph = %self.name, count, path = %path.as_ref().display(), "参数已保存");
        Ok(())
    }

    /// 从二进制文件加载参数
    ///
    /// 图中每个参数都必须在文件中找到同名且同形状的张量，否则报错且不修改任何参数。
    pub fn load_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GraphError> {
        let file = File::open(path.as_ref())
            .map_err(|e| GraphError::Serialization(format!("无法打开参数文件: {e}")))?;
        let content: ParamsFile = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| GraphError::Serialization(format!("读取参数失败: {e}")))?;
        if content.magic != PARAMS_MAGIC {
            return Err(GraphError::Serialization(
                "无效的参数文件：请确保使用 save_params() 保存的文件".to_string(),
            ));
        }
        if content.version != PARAMS_VERSION {
            return Err(GraphError::Serialization(format!(
                "不支持的参数文件版本: {}",
                content.version
            )));
        }

        // 先全部校验，再统一写入
        let mut updates = Vec::new();
        for id in self.get_trainable_nodes() {
            let node = self.get_node(id)?;
            let value = content.params.get(node.name()).ok_or_else(|| {
                GraphError::Serialization(format!("参数文件中缺少参数{}", node.name()))
            })?;
            if value.shape() != node.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: node.value_expected_shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("参数{}的形状与文件中不一致", node.name()),
                });
            }
            updates.push((id, value));
        }
        for (id, value) in updates {
            self.set_node_value(id, Some(value))?;
        }
        debug!(graph = %self.name, count = content.params.len(), "参数已加载");
        Ok(())
    }
}
