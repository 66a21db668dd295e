pub mod command;
pub mod github;
pub mod repository;

use std::path::{Path, PathBuf};

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use github::{GhCli, PullRequestOps, PullRequestRequest};

/// Git 仓库操作的统一接口
///
/// Pull Request 流程所需的全部本地 Git 操作。
/// 主要实现：[`GitRepository`](repository::GitRepository)
///
/// # 设计理念
/// - 读操作（分支、暂存区状态）走 git2
/// - 写操作（checkout / add / commit / push）走 git CLI，以触发 hooks 和凭据助手
/// - 支持 mock 测试（通过 `mockall`）
///
/// # 示例
/// ```no_run
/// use testgen_rs::git::{GitOperations, repository::GitRepository};
///
/// # fn main() -> anyhow::Result<()> {
/// let repo = GitRepository::open()?;
/// if repo.has_staged_changes()? {
///     println!("index is not clean");
/// }
/// # Ok(())
/// # }
/// ```
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait GitOperations {
    /// 仓库工作区根目录
    fn workdir(&self) -> PathBuf;

    /// 获取当前分支名
    ///
    /// # 返回
    /// - `Ok(Some(name))` - 当前分支名（如 "main"）
    /// - `Ok(None)` - detached HEAD 或空仓库
    /// - `Err(_)` - Git 操作失败
    fn current_branch(&self) -> Result<Option<String>>;

    /// 检查暂存区是否已有变更
    ///
    /// 已有 staged changes 时 PR 流程拒绝继续，避免把用户的改动一起提交。
    fn has_staged_changes(&self) -> Result<bool>;

    /// 创建并切换到新分支（`git checkout -b`）
    fn create_branch(&self, name: &str) -> Result<()>;

    /// 暂存指定文件（`git add`）
    ///
    /// # 参数
    /// - `files`: 文件路径，绝对路径或相对于当前目录
    fn stage_files(&self, files: &[PathBuf]) -> Result<()>;

    /// 执行 git commit
    ///
    /// # 返回
    /// - `Ok(hash)` - 新 commit 的短 hash
    fn commit(&self, message: &str) -> Result<String>;

    /// 推送分支并设置 upstream（`git push --set-upstream <remote> <branch>`）
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

/// 从当前工作目录向上查找 git 仓库根目录
///
/// 等价于 `git rev-parse --show-toplevel`。
/// 检查每一级目录是否存在 `.git`（目录或文件，兼容 submodule/worktree）。
pub fn find_git_root() -> Option<PathBuf> {
    let dir = std::env::current_dir().ok()?;
    find_git_root_from(&dir)
}

/// 从 `start` 向上查找 git 仓库根目录
pub fn find_git_root_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_git_root_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("output").join("generated_tests");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root_from(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_find_git_root_accepts_git_file() {
        // worktrees and submodules use a `.git` file
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: ../.git/worktrees/x").unwrap();
        assert_eq!(find_git_root_from(dir.path()), Some(dir.path().to_path_buf()));
    }
}
