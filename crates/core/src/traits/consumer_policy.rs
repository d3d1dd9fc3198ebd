use crate::models::Task;

/// 消费者类任务策略接口
pub trait ConsumerPolicy: Send + Sync {
    /// 处理类型是否属于消费者集合
    fn is_consumer_class(&self, process: &str) -> bool;

    /// 为消费者类任务计算漏斗分组ID，相同输入必须得到相同结果
    fn derive_group_id(&self, task: &Task) -> String;
}
