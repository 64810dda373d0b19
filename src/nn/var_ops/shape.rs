/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, Var};

/// 形状变换扩展 trait
///
/// # 使用示例
/// ```ignore
/// use torchts::nn::VarShapeOps;
///
/// let x_t = inputs.select(0, t)?;              // [seq, batch, d] -> [batch, d]
/// let h = state.reshape(&[batch, nodes, units])?;
/// let r = gates.narrow(1, 0, units)?;
/// ```
pub trait VarShapeOps {
    /// 变形（元素个数须一致）
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError>;

    /// 维度重排：输出第i维为输入的第`axes[i]`维
    fn permute(&self, axes: &[usize]) -> Result<Var, GraphError>;

    /// 沿`axis`截取`[start, start + len)`
    fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<Var, GraphError>;

    /// 选取`axis`上第`index`个切片（降一维）
    fn select(&self, axis: usize, index: usize) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_reshape_node(self.node_id(), shape)?;
        Ok(self.derive(id))
    }

    fn permute(&self, axes: &[usize]) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_permute_node(self.node_id(), axes)?;
        Ok(self.derive(id))
    }

    fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_narrow_node(self.node_id(), axis, start, len)?;
        Ok(self.derive(id))
    }

    fn select(&self, axis: usize, index: usize) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_select_node(self.node_id(), axis, index)?;
        Ok(self.derive(id))
    }
}

impl Var {
    /// 沿`axis`拼接多个 Var（须来自同一个 Graph）
    pub fn concat(vars: &[&Self], axis: usize) -> Result<Self, GraphError> {
        let first = vars
            .first()
            .ok_or_else(|| GraphError::InvalidOperation("拼接的 Var 列表为空".to_string()))?;
        for var in vars {
            first.check_same_graph(var, "拼接")?;
        }
        let ids = vars.iter().map(|v| v.node_id()).collect::<Vec<_>>();
        let id = first.graph().borrow_mut().new_concat_node(&ids, axis)?;
        Ok(first.derive(id))
    }

    /// 在首位新增一维并堆叠：n个`[a, b]` -> `[n, a, b]`
    pub fn stack(vars: &[&Self]) -> Result<Self, GraphError> {
        let expanded = vars
            .iter()
            .map(|v| {
                let mut shape = vec![1];
                shape.extend(v.value_expected_shape()?);
                v.reshape(&shape)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::concat(&expanded.iter().collect::<Vec<_>>(), 0)
    }
}
