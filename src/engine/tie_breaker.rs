// ==========================================
// 个别指导排课系统 - 平局随机源
// ==========================================
// 职责: 为时段评分、候选学生排序提供 [0, 1) 的平局值
// 红线: 只允许显式注入的固定种子随机源，相同输入必须得到相同时间割
// ==========================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 平局随机源
pub trait TieBreaker {
    /// 下一个平局值，范围 [0, 1)
    fn draw(&mut self) -> f64;
}

// ==========================================
// SeededTieBreaker - 固定种子随机源（正式运行）
// ==========================================
#[derive(Debug, Clone)]
pub struct SeededTieBreaker {
    rng: StdRng,
}

impl SeededTieBreaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TieBreaker for SeededTieBreaker {
    fn draw(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

// ==========================================
// SequenceTieBreaker - 固定序列（测试替身）
// ==========================================
// 按给定序列循环输出；空序列恒为 0
#[derive(Debug, Clone)]
pub struct SequenceTieBreaker {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceTieBreaker {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// 恒为 0: 平局完全由稳定排序决定
    pub fn zeros() -> Self {
        Self::new(Vec::new())
    }
}

impl TieBreaker for SequenceTieBreaker {
    fn draw(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

impl<T: TieBreaker + ?Sized> TieBreaker for &mut T {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}
