/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
/// - 由于 Var 携带图引用，`forward()` 不需要 `&Graph` 参数
///
/// # 使用示例
///
/// ```ignore
/// struct Head {
///     fc1: Linear,
///     fc2: Linear,
/// }
///
/// impl Module for Head {
///     fn parameters(&self) -> Vec<Var> {
///         [self.fc1.parameters(), self.fc2.parameters()].concat()
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数
    ///
    /// 用于：
    /// - 优化器需要知道要更新哪些参数
    /// - 梯度裁剪、参数持久化
    /// - 统计参数数量
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数（Var）个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取所有参数的标量元素总数
    fn num_param_elements(&self) -> usize {
        self.parameters()
            .iter()
            .filter_map(|p| p.value_expected_shape().ok())
            .map(|shape| shape.iter().product::<usize>())
            .sum()
    }
}
