use std::path::{Path, PathBuf};

use git2::{DiffOptions, Repository};

use crate::error::{Result, TestgenError};
use crate::git::GitOperations;
use crate::git::command::run_git;

pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepository {
    /// 打开当前目录所在的 git 仓库
    pub fn open() -> Result<Self> {
        Self::discover(Path::new("."))
    }

    /// 从 `path` 向上查找并打开 git 仓库
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| TestgenError::GitCommand("bare repositories are not supported".into()))?;
        Ok(Self { repo, workdir })
    }

    /// 检查仓库是否为空（无任何提交）
    pub fn is_empty(&self) -> Result<bool> {
        // 检测 unborn branch：尝试获取 HEAD，如果失败且错误码是 UnbornBranch，则为空仓库
        match self.repo.head() {
            Ok(_) => Ok(false),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl GitOperations for GitRepository {
    fn workdir(&self) -> PathBuf {
        self.workdir.clone()
    }

    fn current_branch(&self) -> Result<Option<String>> {
        // Unborn branch 没有真正的分支信息
        if self.is_empty()? {
            return Ok(None);
        }

        let head = self.repo.head()?;
        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            // HEAD 处于 detached 状态
            Ok(None)
        }
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let index = self.repo.index()?;
        let mut opts = DiffOptions::new();

        // 空仓库时，对比 empty tree (None) 和 index
        let head_tree = if self.is_empty()? {
            None
        } else {
            Some(self.repo.head()?.peel_to_tree()?)
        };

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))?;
        Ok(diff.deltas().len() > 0)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        run_git(&self.workdir, &["checkout", "-b", name])?;
        tracing::info!("Created branch {}", name);
        Ok(())
    }

    fn stage_files(&self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            return Err(TestgenError::InvalidInput("no files to stage".into()));
        }

        // 相对路径以调用者的当前目录为准，转换为绝对路径后再交给 git
        let cwd = std::env::current_dir()?;
        let absolute: Vec<String> = files
            .iter()
            .map(|f| {
                if f.is_absolute() {
                    f.display().to_string()
                } else {
                    cwd.join(f).display().to_string()
                }
            })
            .collect();

        let mut args = vec!["add", "--"];
        args.extend(absolute.iter().map(String::as_str));
        run_git(&self.workdir, &args)?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        run_git(&self.workdir, &["commit", "-m", message])?;
        run_git(&self.workdir, &["rev-parse", "--short", "HEAD"])
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        run_git(&self.workdir, &["push", "--set-upstream", remote, branch])?;
        tracing::info!("Pushed {} to {}", branch, remote);
        Ok(())
    }
}
