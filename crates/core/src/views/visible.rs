use swimlane_protocol::RenderCommand;

/// Iterator over the commands that are actually displayed: everything
/// inside a hidden group (at any depth, including the group markers
/// themselves) is skipped.
pub struct VisibleCommands<'a> {
    inner: std::slice::Iter<'a, RenderCommand>,
    depth: usize,
    hidden_at: Option<usize>,
}

pub fn visible_commands(commands: &[RenderCommand]) -> VisibleCommands<'_> {
    VisibleCommands {
        inner: commands.iter(),
        depth: 0,
        hidden_at: None,
    }
}

impl<'a> Iterator for VisibleCommands<'a> {
    type Item = &'a RenderCommand;

    fn next(&mut self) -> Option<Self::Item> {
        for cmd in self.inner.by_ref() {
            match cmd {
                RenderCommand::BeginGroup { hidden, .. } => {
                    self.depth += 1;
                    if *hidden && self.hidden_at.is_none() {
                        self.hidden_at = Some(self.depth);
                    }
                }
                RenderCommand::EndGroup => {
                    let closing = self.depth;
                    self.depth = self.depth.saturating_sub(1);
                    if self.hidden_at == Some(closing) {
                        self.hidden_at = None;
                        continue;
                    }
                }
                _ => {}
            }
            if self.hidden_at.is_none() {
                return Some(cmd);
            }
        }
        None
    }
}
