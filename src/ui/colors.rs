use colored::Colorize;

/// 显示成功消息（绿色 ✓）
pub fn success(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "✓".green().bold(), msg.green());
    } else {
        println!("✓ {}", msg);
    }
}

/// 显示错误消息（红色 ✗）
pub fn error(msg: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// 显示警告消息（黄色 ⚠）
pub fn warning(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "⚠".yellow().bold(), msg.yellow());
    } else {
        println!("⚠ {}", msg);
    }
}

/// 显示信息消息（蓝色 ℹ）
pub fn info(msg: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "ℹ".blue().bold(), msg.blue())
    } else {
        format!("ℹ {}", msg)
    }
}

/// 显示步骤提示（灰色）
pub fn step(step: &str, msg: &str, colored: bool) {
    if colored {
        println!(
            "{} {}",
            format!("[{}]", step).bright_black().bold(),
            msg.bright_black()
        );
    } else {
        println!("[{}] {}", step, msg);
    }
}

/// 显示启动横幅
pub fn banner(model: &str, framework: &str, colored: bool) {
    let title = format!("testgen {}", env!("CARGO_PKG_VERSION"));
    let detail = format!("model: {}  framework: {}", model, framework);
    if colored {
        println!("{}", title.cyan().bold());
        println!("{}", detail.bright_black());
    } else {
        println!("{}", title);
        println!("{}", detail);
    }
    println!();
}

/// 显示缩进的详细信息（灰色）
pub fn detail(msg: &str, colored: bool) {
    if colored {
        println!("    {}", msg.bright_black());
    } else {
        println!("    {}", msg);
    }
}
