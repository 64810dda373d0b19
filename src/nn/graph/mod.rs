/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 计算图：`Graph`句柄（用户级API）+ `GraphInner`（底层实现）
 */

mod error;
mod handle;
mod inner;

pub use error::GraphError;
pub use handle::Graph;
pub use inner::GraphInner;
