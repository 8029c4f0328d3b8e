use crate::graph::{Edge, Graph, Target};

/// One container-membership step below a root: the edge taken and the member
/// it leads to.
#[derive(Debug, Clone, Copy)]
pub struct PathStep<'g> {
    pub edge: &'g Edge,
    pub target: &'g Target,
}

impl<'g> PathStep<'g> {
    pub fn new(edge: &'g Edge, target: &'g Target) -> Self {
        Self { edge, target }
    }

    /// Name the member is shipped under inside its container.
    pub fn segment(&self) -> &'g str {
        self.edge.install_as.as_deref().unwrap_or(&self.target.install_name)
    }
}

/// Builds installed paths: the output root, the root artifact's install
/// location, then one segment per container step.
#[derive(Debug, Clone, Copy)]
pub struct PathBuilder<'g> {
    output_root: &'g str,
}

impl<'g> PathBuilder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { output_root: graph.output_root() }
    }

    pub fn with_output_root(output_root: &'g str) -> Self {
        Self { output_root }
    }

    pub fn root_path(&self, root: &Target) -> String {
        let mut path = String::new();
        push_segment(&mut path, self.output_root);
        if let Some(dir) = &root.install_dir {
            push_segment(&mut path, dir);
        }
        push_segment(&mut path, &root.install_name);
        path
    }

    pub fn install_path(&self, root: &Target, steps: &[PathStep<'_>]) -> String {
        let mut path = self.root_path(root);
        for step in steps {
            push_segment(&mut path, step.segment());
        }
        path
    }
}

fn push_segment(path: &mut String, segment: &str) {
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        return;
    }
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(segment);
}
