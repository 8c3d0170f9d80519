use crate::fields::{FieldSpec, FIELDS};

/// One page of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub index: usize,
    pub title: &'static str,
}

pub const TOTAL_STEPS: usize = 7;

pub const STEPS: [StepSpec; TOTAL_STEPS] = [
    StepSpec {
        index: 0,
        title: "地域情報",
    },
    StepSpec {
        index: 1,
        title: "募集内容",
    },
    StepSpec {
        index: 2,
        title: "応募条件",
    },
    StepSpec {
        index: 3,
        title: "待遇・勤務条件",
    },
    StepSpec {
        index: 4,
        title: "応募について",
    },
    StepSpec {
        index: 5,
        title: "問い合わせ先",
    },
    StepSpec {
        index: 6,
        title: "プレビュー",
    },
];

impl StepSpec {
    /// Fields rendered on this step, in table order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let index = self.index;
        FIELDS.iter().filter(move |spec| spec.step == index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == TOTAL_STEPS
    }
}
