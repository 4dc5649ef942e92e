//! 行处理上下文
//!
//! 封装"我正在处理哪个阶段的第几行"这一信息

use std::fmt::Display;

use crate::models::PassKind;

/// 行处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCtx {
    /// 所在阶段
    pub pass: PassKind,

    /// 行号（从1开始）
    pub row: usize,

    /// 总行数
    pub total: usize,
}

impl RowCtx {
    /// 创建新的行上下文
    ///
    /// # 参数
    /// - `index`: 行在表格中的下标（从0开始）
    pub fn new(pass: PassKind, index: usize, total: usize) -> Self {
        Self {
            pass,
            row: index + 1,
            total,
        }
    }

    /// 行在表格中的下标
    pub fn index(&self) -> usize {
        self.row - 1
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}/{}]", self.pass, self.row, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_one_based_row() {
        let ctx = RowCtx::new(PassKind::Analysis, 2, 5);
        assert_eq!(ctx.to_string(), "[分析 3/5]");
        assert_eq!(ctx.index(), 2);
    }
}
