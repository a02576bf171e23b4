//! Test name filters: `POSITIVE[:POSITIVE...][-NEGATIVE[:NEGATIVE...]]`,
//! each pattern a glob where `*` matches any run and `?` one character.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Filter {
    pub fn parse(spec: &str) -> Self {
        let (pos, neg) = match spec.split_once('-') {
            Some((p, n)) => (p, n),
            None => (spec, ""),
        };
        let split = |s: &str| {
            s.split(':')
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        };
        let mut positive = split(pos);
        if positive.is_empty() {
            positive.push("*".to_owned());
        }
        Self { positive, negative: split(neg) }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.positive.iter().any(|p| glob(p, name)) && !self.negative.iter().any(|p| glob(p, name))
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::parse("*")
    }
}

fn glob(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}
