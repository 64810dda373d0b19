/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 激活函数扩展 trait
 */

use crate::nn::Var;

/// 激活函数扩展 trait
///
/// 一元激活不会有形状错误，因此直接返回 `Var`（节点创建失败时 panic，与算子重载一致）。
pub trait VarActivationOps {
    /// Sigmoid 激活：1 / (1 + exp(-x))
    fn sigmoid(&self) -> Var;

    /// Tanh 激活
    fn tanh(&self) -> Var;
}

impl VarActivationOps for Var {
    fn sigmoid(&self) -> Var {
        let id = self
            .graph()
            .borrow_mut()
            .new_sigmoid_node(self.node_id())
            .expect("创建 Sigmoid 节点失败");
        self.derive(id)
    }

    fn tanh(&self) -> Var {
        let id = self
            .graph()
            .borrow_mut()
            .new_tanh_node(self.node_id())
            .expect("创建 Tanh 节点失败");
        self.derive(id)
    }
}
