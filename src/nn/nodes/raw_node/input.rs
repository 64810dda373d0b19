use super::TraitNode;
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 输入节点的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::nn) enum InputKind {
    /// 每次前向传播的数据（样本、标签、初始隐藏状态等），释放临时节点时一并删除
    Data,
    /// 常驻图中的常量（如图扩散的支撑矩阵）
    Constant,
}

/// 输入节点：值只能通过`set_value`设置，不需要梯度
pub(in crate::nn) struct Input {
    kind: InputKind,
    shape: Vec<usize>,
}

impl Input {
    pub(in crate::nn) fn new(kind: InputKind, shape: &[usize]) -> Result<Self, GraphError> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "输入节点的形状{shape:?}不合法：维度不能为空，且每一维都须大于0"
            )));
        }
        Ok(Self {
            kind,
            shape: shape.to_vec(),
        })
    }

    pub(in crate::nn) const fn kind(&self) -> InputKind {
        self.kind
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        match self.kind {
            InputKind::Data => "input",
            InputKind::Constant => "constant",
        }
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点的值应通过set_value设置，而不是由父节点计算".to_string(),
        ))
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点没有父节点，无需计算对父节点的梯度".to_string(),
        ))
    }
}
