use rayon::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

use super::{library_name, NoticeKey, PathBuilder, PathStep, Resolution, ResolutionSet};
use crate::error::{NoticeError, Result};
use crate::graph::{Graph, LicenseCondition, LinkageKind, Target};

/// A declared condition a target carries, either its own or inherited from a
/// dependency.
#[derive(Debug, Clone, Copy)]
struct Attachment<'g> {
    origin: &'g Target,
    condition: &'g LicenseCondition,
}

/// Propagates declared conditions along dependency edges and records, for
/// every shipped artifact reachable from the roots, which obligations surface
/// at its installed path.
///
/// Linkage policy:
/// - `static`: everything the dependency carries becomes part of the dependent,
///   transitively.
/// - `dynamic` / `runtime`: the dependency ships alongside the dependent, so
///   its own conditions and everything it statically links attach to the
///   dependent. Its further dynamic dependencies are not followed.
/// - `toolchain`: nothing; the tool is not in the output.
/// - `container`: no obligation flows either way; the member is walked as its
///   own shipped artifact below the container's path.
pub struct ConditionResolver<'g> {
    graph: &'g Graph,
    paths: PathBuilder<'g>,
    attached: HashMap<&'g str, Vec<Attachment<'g>>>,
}

/// Resolve every obligation reachable from `roots`.
pub fn resolve_notices(graph: &Graph, roots: &[String]) -> Result<ResolutionSet> {
    ConditionResolver::new(graph).resolve(roots)
}

impl<'g> ConditionResolver<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            paths: PathBuilder::new(graph),
            attached: HashMap::new(),
        }
    }

    pub fn resolve(mut self, roots: &[String]) -> Result<ResolutionSet> {
        if roots.is_empty() {
            return Err(NoticeError::NoRoots);
        }

        let graph = self.graph;
        let root_targets = roots
            .iter()
            .map(|id| graph.get(id).ok_or_else(|| NoticeError::RootNotFound(id.clone())))
            .collect::<Result<Vec<_>>>()?;

        let shipped = self.shipped_targets(&root_targets)?;
        for &target in &shipped {
            let attachments = self.attachments_of(target)?;
            self.attached.insert(target.id.as_str(), attachments);
        }

        // Walks share nothing mutable; merging in root order keeps the result
        // independent of scheduling.
        let this = &self;
        let walks = root_targets
            .par_iter()
            .map(|&root| this.walk_root(root))
            .collect::<Result<Vec<_>>>()?;

        let mut resolutions = ResolutionSet::new();
        for walk in walks {
            for resolution in walk {
                resolutions.insert(resolution);
            }
        }

        debug!(
            roots = roots.len(),
            shipped = shipped.len(),
            resolutions = resolutions.len(),
            "Resolved notice conditions"
        );
        Ok(resolutions)
    }

    /// Targets reachable from the roots through container membership, each
    /// once. Validates every edge it passes.
    fn shipped_targets(&self, roots: &[&'g Target]) -> Result<Vec<&'g Target>> {
        let mut seen: HashSet<&'g str> = HashSet::new();
        let mut queue: VecDeque<&'g Target> = VecDeque::new();
        let mut shipped = Vec::new();

        for &root in roots {
            if seen.insert(root.id.as_str()) {
                queue.push_back(root);
            }
        }

        while let Some(target) = queue.pop_front() {
            shipped.push(target);
            for edge in &target.deps {
                let dep = self.dependency(target, &edge.dependency)?;
                if edge.linkage != LinkageKind::Container {
                    continue;
                }
                if !target.is_container() {
                    return Err(NoticeError::MalformedEdge {
                        from: target.id.clone(),
                        to: dep.id.clone(),
                        reason: "container membership edge from a non-container target".to_string(),
                    });
                }
                if seen.insert(dep.id.as_str()) {
                    queue.push_back(dep);
                }
            }
        }

        Ok(shipped)
    }

    fn attachments_of(&self, target: &'g Target) -> Result<Vec<Attachment<'g>>> {
        let mut attachments = Vec::new();
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        self.collect(target, true, &mut visited, &mut seen, &mut attachments)?;
        Ok(attachments)
    }

    /// Attach `target`'s conditions and those of its static closure. With
    /// `follow_dynamic`, dynamic and runtime dependencies contribute their own
    /// static closure too.
    fn collect(
        &self,
        target: &'g Target,
        follow_dynamic: bool,
        visited: &mut HashSet<&'g str>,
        seen: &mut HashSet<(&'g str, &'g LicenseCondition)>,
        out: &mut Vec<Attachment<'g>>,
    ) -> Result<()> {
        // static-link cycle
        if !visited.insert(target.id.as_str()) {
            return Ok(());
        }

        push_own(target, seen, out);

        for edge in &target.deps {
            let dep = self.dependency(target, &edge.dependency)?;
            match edge.linkage {
                LinkageKind::Static => self.collect(dep, follow_dynamic, visited, seen, out)?,
                LinkageKind::Dynamic | LinkageKind::Runtime if follow_dynamic => {
                    let mut linked = HashSet::new();
                    self.collect(dep, false, &mut linked, seen, out)?;
                }
                LinkageKind::Dynamic
                | LinkageKind::Runtime
                | LinkageKind::Toolchain
                | LinkageKind::Container => {}
            }
        }

        Ok(())
    }

    fn walk_root(&self, root: &'g Target) -> Result<Vec<Resolution>> {
        let mut out = Vec::new();
        let mut steps = Vec::new();
        let mut on_path = HashSet::new();
        on_path.insert(root.id.as_str());

        self.visit(root, root, &mut steps, &mut on_path, &mut out)?;

        debug!(root = %root.id, resolutions = out.len(), "Walked root");
        Ok(out)
    }

    fn visit(
        &self,
        root: &'g Target,
        target: &'g Target,
        steps: &mut Vec<PathStep<'g>>,
        on_path: &mut HashSet<&'g str>,
        out: &mut Vec<Resolution>,
    ) -> Result<()> {
        if steps.len() >= self.graph.len() {
            return Err(NoticeError::CycleDetected {
                root: root.id.clone(),
                at: target.id.clone(),
            });
        }

        let install_path = self.paths.install_path(root, steps);
        let attachments = self.attached.get(target.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);

        for attachment in attachments {
            let resolution = Resolution {
                notice: NoticeKey::from(attachment.condition),
                library: library_name(attachment.origin, attachment.condition),
                install_path: install_path.clone(),
                shipped: target.id.clone(),
                origin: attachment.origin.id.clone(),
            };
            trace!(
                category = %resolution.notice.category,
                library = %resolution.library,
                path = %resolution.install_path,
                "Resolved obligation"
            );
            out.push(resolution);
        }

        for edge in &target.deps {
            if edge.linkage != LinkageKind::Container {
                continue;
            }
            let member = self.dependency(target, &edge.dependency)?;
            if !on_path.insert(member.id.as_str()) {
                debug!(container = %target.id, member = %member.id, "Breaking container cycle");
                continue;
            }

            steps.push(PathStep::new(edge, member));
            let result = self.visit(root, member, steps, on_path, out);
            steps.pop();
            on_path.remove(member.id.as_str());
            result?;
        }

        Ok(())
    }

    fn dependency(&self, from: &Target, id: &str) -> Result<&'g Target> {
        self.graph.get(id).ok_or_else(|| NoticeError::GraphIncomplete {
            from: from.id.clone(),
            missing: id.to_string(),
        })
    }
}

fn push_own<'g>(
    target: &'g Target,
    seen: &mut HashSet<(&'g str, &'g LicenseCondition)>,
    out: &mut Vec<Attachment<'g>>,
) {
    for condition in &target.conditions {
        if seen.insert((target.id.as_str(), condition)) {
            out.push(Attachment { origin: target, condition });
        }
    }
}
