use crate::nn::{GraphError, Var};
use tracing::trace;

/// 防止除零的小量
const CLIP_EPSILON: f32 = 1e-6;

/// 按全局 L2 范数裁剪梯度
///
/// 计算所有参数梯度拼在一起的 L2 范数`total`；若超过`max_norm`，
/// 每个梯度都乘以`max_norm / (total + 1e-6)`。没有梯度的参数跳过。
/// 返回裁剪前的范数。
pub fn clip_grad_norm(params: &[Var], max_norm: f32) -> Result<f32, GraphError> {
    if !(max_norm > 0.0) {
        return Err(GraphError::InvalidOperation(format!(
            "梯度裁剪的阈值须大于0，实际为{max_norm}"
        )));
    }

    let mut grads = Vec::with_capacity(params.len());
    for param in params {
        if let Some(grad) = param.grad()? {
            grads.push((param, grad));
        }
    }
    let total_norm = grads
        .iter()
        .map(|(_, g)| g.norm_squared())
        .sum::<f32>()
        .sqrt();

    if total_norm > max_norm {
        let scale = max_norm / (total_norm + CLIP_EPSILON);
        for (param, grad) in &grads {
            param
                .graph()
                .borrow_mut()
                .set_node_grad(param.node_id(), Some(&(grad * scale)))?;
        }
        trace!(total_norm, max_norm, scale, "梯度已裁剪");
    }
    Ok(total_norm)
}
