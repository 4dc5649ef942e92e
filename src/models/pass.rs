/// 增强阶段
///
/// 每个阶段对应一套提示词和一组固定的派生列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// 题目分析：考查内容 / 正确认知路径 / 干扰项分析
    Analysis,
    /// 教学建议：巩固 / 进阶
    Recommendation,
}

/// 生成调用失败时，该行所有派生列的取值
pub const API_ERROR_SENTINEL: &str = "ERROR API";

/// 分析结果中某个标题缺失时的取值
pub const SECTION_ERROR_SENTINEL: &str = "ERROR";

/// 建议结果中找不到 "AVANZAR" 标题时的取值
pub const ADVANCE_NOT_FOUND_SENTINEL: &str = "ERROR: No se encontró 'AVANZAR'";

pub const QUE_EVALUA: &str = "Que_Evalua";
pub const JUSTIFICACION_CORRECTA: &str = "Justificacion_Correcta";
pub const ANALISIS_DISTRACTORES: &str = "Analisis_Distractores";
pub const RECOMENDACION_FORTALECER: &str = "Recomendacion_Fortalecer";
pub const RECOMENDACION_AVANZAR: &str = "Recomendacion_Avanzar";

impl PassKind {
    /// 按执行顺序排列的全部阶段
    pub const ALL: [PassKind; 2] = [PassKind::Analysis, PassKind::Recommendation];

    /// 本阶段追加的列（顺序固定）
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            PassKind::Analysis => &[QUE_EVALUA, JUSTIFICACION_CORRECTA, ANALISIS_DISTRACTORES],
            PassKind::Recommendation => &[RECOMENDACION_FORTALECER, RECOMENDACION_AVANZAR],
        }
    }

    /// 日志中显示的名称
    pub fn label(self) -> &'static str {
        match self {
            PassKind::Analysis => "分析",
            PassKind::Recommendation => "建议",
        }
    }
}

/// 判断一个值是否为哨兵值
pub fn is_sentinel(value: &str) -> bool {
    matches!(
        value.trim(),
        API_ERROR_SENTINEL | SECTION_ERROR_SENTINEL | ADVANCE_NOT_FOUND_SENTINEL
    )
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
