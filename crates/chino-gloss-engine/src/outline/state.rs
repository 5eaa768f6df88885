use super::SectionNumber;

/// Running section counters, one per active outline depth.
///
/// The stack always holds `indent + 1` counters for the indent of the last
/// line processed, so the previous indent never has to be tracked separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterStack(Vec<u32>);

/// Raised when a line descends more than one level below its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverIndent {
    pub indent: usize,
    pub previous: usize,
}

/// Outcome of feeding one line's indent to a [`CounterStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: CounterStack,
    /// Set when the line opened a new depth: the section that just became a parent.
    pub new_parent: Option<SectionNumber>,
}

impl CounterStack {
    pub fn new() -> Self {
        Self(vec![0])
    }

    /// Indent of the last line processed.
    pub fn indent(&self) -> usize {
        self.0.len() - 1
    }

    pub fn section(&self) -> SectionNumber {
        SectionNumber::new(self.0.clone())
    }

    /// The single transition of the outline state machine.
    pub fn advance(&self, indent: usize) -> Result<Step, OverIndent> {
        let previous = self.indent();
        if indent > previous + 1 {
            return Err(OverIndent { indent, previous });
        }

        let mut counters = self.0.clone();
        let mut new_parent = None;

        if indent == previous {
            if let Some(last) = counters.last_mut() {
                *last += 1;
            }
        } else if indent > previous {
            new_parent = Some(self.section());
            counters.push(1);
        } else {
            let continued = counters[indent] + 1;
            counters.truncate(indent);
            counters.push(continued);
        }

        Ok(Step {
            next: Self(counters),
            new_parent,
        })
    }
}

impl Default for CounterStack {
    fn default() -> Self {
        Self::new()
    }
}

/// A counter stack needs at least the root counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCounterStack;

impl TryFrom<Vec<u32>> for CounterStack {
    type Error = EmptyCounterStack;

    fn try_from(counters: Vec<u32>) -> Result<Self, Self::Error> {
        if counters.is_empty() {
            return Err(EmptyCounterStack);
        }
        Ok(Self(counters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn stack(counters: &[u32]) -> CounterStack {
        CounterStack::try_from(counters.to_vec()).unwrap()
    }

    #[test]
    fn first_line_starts_group_one() {
        let step = CounterStack::new().advance(0).unwrap();
        assert_eq!(step.next, stack(&[1]));
        assert_eq!(step.new_parent, None);
    }

    #[rstest]
    #[case(&[1], 0, &[2])]
    #[case(&[1, 4], 1, &[1, 5])]
    #[case(&[2, 1, 1], 2, &[2, 1, 2])]
    fn sibling_increments_deepest(#[case] from: &[u32], #[case] indent: usize, #[case] to: &[u32]) {
        let step = stack(from).advance(indent).unwrap();
        assert_eq!(step.next, stack(to));
        assert_eq!(step.new_parent, None);
    }

    #[rstest]
    #[case(&[1], 1, &[1, 1], "1")]
    #[case(&[3, 2], 2, &[3, 2, 1], "3.2")]
    fn descend_marks_previous_as_parent(
        #[case] from: &[u32],
        #[case] indent: usize,
        #[case] to: &[u32],
        #[case] parent: &str,
    ) {
        let step = stack(from).advance(indent).unwrap();
        assert_eq!(step.next, stack(to));
        assert_eq!(step.new_parent.unwrap().to_string(), parent);
    }

    #[rstest]
    #[case(&[1, 1, 1], 0, &[2])]
    #[case(&[1, 3, 2], 1, &[1, 4])]
    #[case(&[2, 1, 5, 1], 1, &[2, 2])]
    fn dedent_continues_shallower_sibling(
        #[case] from: &[u32],
        #[case] indent: usize,
        #[case] to: &[u32],
    ) {
        let step = stack(from).advance(indent).unwrap();
        assert_eq!(step.next, stack(to));
        assert_eq!(step.new_parent, None);
    }

    #[rstest]
    #[case(&[1], 2)]
    #[case(&[1, 1], 3)]
    #[case(&[0], 5)]
    fn over_indent_is_rejected(#[case] from: &[u32], #[case] indent: usize) {
        let err = stack(from).advance(indent).unwrap_err();
        assert_eq!(
            err,
            OverIndent {
                indent,
                previous: from.len() - 1,
            }
        );
    }

    #[test]
    fn stack_without_root_counter_is_rejected() {
        assert_eq!(CounterStack::try_from(Vec::new()), Err(EmptyCounterStack));
        assert_eq!(CounterStack::try_from(vec![0]).unwrap(), CounterStack::new());
    }

    #[test]
    fn leading_indent_opens_group_zero() {
        let step = CounterStack::new().advance(1).unwrap();
        assert_eq!(step.next, stack(&[0, 1]));
        assert_eq!(step.new_parent.unwrap().to_string(), "0");
    }
}
