//! 响应切分服务 - 业务能力层
//!
//! 按固定顺序的标题把模型返回的自由文本切成命名段落。
//! 标题缺失或顺序错乱时按固定的回退规则处理，不会返回错误。

use tracing::debug;

use crate::models::pass::{
    PassKind, ADVANCE_NOT_FOUND_SENTINEL, API_ERROR_SENTINEL, SECTION_ERROR_SENTINEL,
};

pub const HEADER_QUE_EVALUA: &str = "Qué Evalúa:";
pub const HEADER_RUTA_COGNITIVA: &str = "Ruta Cognitiva Correcta:";
pub const HEADER_DISTRACTORES: &str = "Análisis de Opciones No Válidas:";
pub const HEADER_AVANZAR: &str = "RECOMENDACIÓN PARA AVANZAR";

/// 分析结果的三个标题（区分大小写）
pub const ANALYSIS_MARKERS: [Marker; 3] = [
    Marker::exact(HEADER_QUE_EVALUA),
    Marker::exact(HEADER_RUTA_COGNITIVA),
    Marker::exact(HEADER_DISTRACTORES),
];

/// 建议结果的分界标题（不区分大小写）
pub const ADVANCE_MARKER: Marker = Marker::ignore_case(HEADER_AVANZAR);

/// 段落标题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub header: &'static str,
    pub ignore_case: bool,
}

impl Marker {
    pub const fn exact(header: &'static str) -> Self {
        Self {
            header,
            ignore_case: false,
        }
    }

    pub const fn ignore_case(header: &'static str) -> Self {
        Self {
            header,
            ignore_case: true,
        }
    }

    /// 从 `from` 开始查找标题，返回字节区间 `(start, end)`
    pub fn find_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let haystack = text.get(from..)?;
        if !self.ignore_case {
            return haystack
                .find(self.header)
                .map(|i| (from + i, from + i + self.header.len()));
        }
        haystack.char_indices().find_map(|(i, _)| {
            prefix_len_ignore_case(&haystack[i..], self.header).map(|len| (from + i, from + i + len))
        })
    }
}

/// `text` 以 `header` 开头（忽略大小写）时返回 `text` 中匹配部分的字节长度
///
/// 逐字符比较，大小写转换改变字节长度时偏移量仍然落在 `text` 的字符边界上。
fn prefix_len_ignore_case(text: &str, header: &str) -> Option<usize> {
    let mut consumed = 0;
    let mut chars = text.chars();
    for expected in header.chars() {
        let actual = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        consumed += actual.len_utf8();
    }
    Some(consumed)
}

/// 切分结果
///
/// 每个声明的列恰好有一个值，失败时为哨兵值，不会缺项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedResult {
    kind: PassKind,
    values: Vec<String>,
}

impl SegmentedResult {
    fn new(kind: PassKind, values: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), kind.columns().len());
        Self { kind, values }
    }

    /// 所有列都填同一个哨兵值
    pub fn sentinel(kind: PassKind, sentinel: &str) -> Self {
        Self::new(kind, vec![sentinel.to_string(); kind.columns().len()])
    }

    /// 生成调用失败时的结果
    pub fn api_error(kind: PassKind) -> Self {
        Self::sentinel(kind, API_ERROR_SENTINEL)
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.kind
            .columns()
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// 按列顺序返回 `(列名, 值)`
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.kind
            .columns()
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// 按阶段切分
pub fn segment(kind: PassKind, completion: &str) -> SegmentedResult {
    match kind {
        PassKind::Analysis => segment_analysis(completion),
        PassKind::Recommendation => segment_recommendation(completion),
    }
}

/// 按顺序定位标题
///
/// 每个标题只在上一个已定位标题之后查找，所以顺序错乱的标题视为缺失。
pub fn locate_markers(text: &str, markers: &[Marker]) -> Vec<Option<(usize, usize)>> {
    let mut cursor = 0;
    markers
        .iter()
        .map(|marker| {
            let found = marker.find_from(text, cursor);
            if let Some((_, end)) = found {
                cursor = end;
            }
            found
        })
        .collect()
}

/// `from` 之后最早出现的任一标题的起始位置，没有时为文本末尾
///
/// 顺序错乱而被视为缺失的标题同样作为段落边界，不会混入前一段。
fn next_marker_start(text: &str, markers: &[Marker], from: usize) -> usize {
    markers
        .iter()
        .filter_map(|marker| marker.find_from(text, from))
        .map(|(start, _)| start)
        .min()
        .unwrap_or(text.len())
}

/// 切分分析结果
///
/// - 段落内容为本标题结尾到其后最早出现的任一标题开头之间的文本（没有时到文本末尾）
/// - 第一个标题缺失：第一段取第一个标题之前的全部文本（都没有时为整段文本）
/// - 其他标题缺失：该段为 `ERROR`
pub fn segment_analysis(completion: &str) -> SegmentedResult {
    let spans = locate_markers(completion, &ANALYSIS_MARKERS);

    let values = spans
        .iter()
        .enumerate()
        .map(|(index, span)| match span {
            Some((_, end)) => {
                let stop = next_marker_start(completion, &ANALYSIS_MARKERS, *end);
                completion[*end..stop].trim().to_string()
            }
            None if index == 0 => {
                debug!("未找到标题 '{}'，第一段使用前置文本", ANALYSIS_MARKERS[0].header);
                let stop = next_marker_start(completion, &ANALYSIS_MARKERS, 0);
                completion[..stop].trim().to_string()
            }
            None => {
                debug!("未找到标题 '{}'", ANALYSIS_MARKERS[index].header);
                SECTION_ERROR_SENTINEL.to_string()
            }
        })
        .collect();

    SegmentedResult::new(PassKind::Analysis, values)
}

/// 切分建议结果
///
/// 以 "RECOMENDACIÓN PARA AVANZAR"（不区分大小写）为界：
/// 之前为巩固建议，之后（含标题）为进阶建议。
/// 找不到该标题时，整段文本为巩固建议，进阶建议为哨兵值。
pub fn segment_recommendation(completion: &str) -> SegmentedResult {
    let values = match ADVANCE_MARKER.find_from(completion, 0) {
        Some((start, _)) => vec![
            completion[..start].trim().to_string(),
            completion[start..].trim().to_string(),
        ],
        None => {
            debug!("未找到标题 '{}'", HEADER_AVANZAR);
            vec![
                completion.trim().to_string(),
                ADVANCE_NOT_FOUND_SENTINEL.to_string(),
            ]
        }
    };
    SegmentedResult::new(PassKind::Recommendation, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pass::{ANALISIS_DISTRACTORES, JUSTIFICACION_CORRECTA, QUE_EVALUA};

    const WELL_FORMED: &str = "Qué Evalúa:\nSuma simple.\nRuta Cognitiva Correcta:\nEl estudiante suma.\nAnálisis de Opciones No Válidas:\n- ...";

    #[test]
    fn test_analysis_well_formed() {
        let result = segment_analysis(WELL_FORMED);
        assert_eq!(result.get(QUE_EVALUA), Some("Suma simple."));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some("El estudiante suma."));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some("- ..."));
        assert!(result.iter().all(|(_, v)| v != SECTION_ERROR_SENTINEL));
    }

    #[test]
    fn test_analysis_resegmenting_reconstruction_is_stable() {
        let first = segment_analysis(WELL_FORMED);
        let rebuilt: String = ANALYSIS_MARKERS
            .iter()
            .zip(first.iter())
            .map(|(marker, (_, value))| format!("{}\n{}\n", marker.header, value))
            .collect();
        assert_eq!(segment_analysis(&rebuilt), first);
    }

    #[test]
    fn test_analysis_without_markers() {
        let text = "  El modelo respondió sin títulos.  ";
        let result = segment_analysis(text);
        assert_eq!(result.get(QUE_EVALUA), Some("El modelo respondió sin títulos."));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some(SECTION_ERROR_SENTINEL));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some(SECTION_ERROR_SENTINEL));
    }

    #[test]
    fn test_analysis_missing_first_marker_uses_preamble() {
        let text = "Evalúa sumas.\nRuta Cognitiva Correcta:\nSuma.\nAnálisis de Opciones No Válidas:\nA resta.";
        let result = segment_analysis(text);
        assert_eq!(result.get(QUE_EVALUA), Some("Evalúa sumas."));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some("Suma."));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some("A resta."));
    }

    #[test]
    fn test_analysis_missing_middle_marker() {
        let text = "Qué Evalúa:\nSumas.\nAnálisis de Opciones No Válidas:\nA resta.";
        let result = segment_analysis(text);
        assert_eq!(result.get(QUE_EVALUA), Some("Sumas."));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some(SECTION_ERROR_SENTINEL));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some("A resta."));
    }

    #[test]
    fn test_analysis_missing_last_marker_extends_to_end() {
        let text = "Qué Evalúa:\nSumas.\nRuta Cognitiva Correcta:\nSuma y verifica.";
        let result = segment_analysis(text);
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some("Suma y verifica."));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some(SECTION_ERROR_SENTINEL));
    }

    #[test]
    fn test_analysis_out_of_order_marker_counts_as_missing() {
        let text = "Ruta Cognitiva Correcta:\nSuma.\nQué Evalúa:\nSumas.\nAnálisis de Opciones No Válidas:\nA resta.";
        let result = segment_analysis(text);
        assert_eq!(result.get(QUE_EVALUA), Some("Sumas."));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some(SECTION_ERROR_SENTINEL));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some("A resta."));
    }

    #[test]
    fn test_analysis_out_of_order_marker_still_bounds_previous_section() {
        let text = "Qué Evalúa:\nX\nAnálisis de Opciones No Válidas:\nY\nRuta Cognitiva Correcta:\nZ";
        let result = segment_analysis(text);
        assert_eq!(result.get(QUE_EVALUA), Some("X"));
        assert_eq!(result.get(JUSTIFICACION_CORRECTA), Some("Z"));
        assert_eq!(result.get(ANALISIS_DISTRACTORES), Some(SECTION_ERROR_SENTINEL));
        assert!(result.iter().all(|(_, v)| !v.contains(HEADER_DISTRACTORES)));
    }

    #[test]
    fn test_analysis_markers_are_case_sensitive() {
        let result = segment_analysis("QUÉ EVALÚA:\nSumas.");
        assert_eq!(result.get(QUE_EVALUA), Some("QUÉ EVALÚA:\nSumas."));
    }

    #[test]
    fn test_recommendation_split_keeps_headings() {
        let text = "RECOMENDACIÓN PARA FORTALECER EL APRENDIZAJE\nContar fichas.\n\nRecomendación para avanzar el aprendizaje\nUsar fracciones.";
        let result = segment_recommendation(text);
        let values = result.into_values();
        assert_eq!(values[0], "RECOMENDACIÓN PARA FORTALECER EL APRENDIZAJE\nContar fichas.");
        assert_eq!(values[1], "Recomendación para avanzar el aprendizaje\nUsar fracciones.");
    }

    #[test]
    fn test_recommendation_without_advance_marker() {
        let text = "RECOMENDACIÓN PARA FORTALECER\nContar fichas.";
        let values = segment_recommendation(text).into_values();
        assert_eq!(values[0], text);
        assert_eq!(values[1], ADVANCE_NOT_FOUND_SENTINEL);
    }

    #[test]
    fn test_ignore_case_offsets_with_multibyte_text() {
        let text = "ñandú recomendación para avanzar: más";
        let (start, end) = ADVANCE_MARKER.find_from(text, 0).unwrap();
        assert_eq!(&text[start..end], "recomendación para avanzar");
    }

    #[test]
    fn test_api_error_fills_every_column() {
        let result = SegmentedResult::api_error(PassKind::Analysis);
        assert_eq!(result.iter().count(), 3);
        assert!(result.iter().all(|(_, v)| v == API_ERROR_SENTINEL));
    }
}
