// ==========================================
// 交通调查入库系统 - 身份解析
// ==========================================
// 职责: 自然键 → 代理 id，进程内缓存叠加在数据库之上
// 规则:
// - 词表只读，从不新建行；查询结果必须恰好 1 行
// - 复合键先查缓存，再按 (父级 id, 类型 id) 查库，两处都没有才建行
// - 先 get 后 record 属于阶段顺序错误
// - 每次运行构造一个 TransactionContext，按引用传给各阶段
// ==========================================

use crate::domain::{DirectionMovementKey, MovementVehicleKey, StudyDirectionKey};
use crate::engine::error::{ResolutionError, ResolutionResult};
use crate::repository::RelationalWriter;
use crate::schema::{
    directions_movements_columns as dm, movements_vehicles_columns as mv,
    studies_directions_columns as sd, table_names, VocabularyTable, DIRECTION_VOCABULARY,
    MOVEMENT_VOCABULARY, VEHICLE_VOCABULARY,
};
use rusqlite::types::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// lookup_or_create 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// 缓存或数据库中已存在
    Found(i64),
    /// 本次新建并已记录
    Created(i64),
}

impl Resolved {
    pub fn id(self) -> i64 {
        match self {
            Resolved::Found(id) | Resolved::Created(id) => id,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, Resolved::Created(_))
    }
}

// ==========================================
// IdentityResolver Trait
// ==========================================
// 实现者: TransactionContext
pub trait IdentityResolver {
    // ===== 词表 =====
    fn direction_type_id(&mut self, name: &str) -> ResolutionResult<i64>;
    fn movement_type_id(&mut self, name: &str) -> ResolutionResult<i64>;
    fn vehicle_type_id(&mut self, name: &str) -> ResolutionResult<i64>;

    /// 全部车型名称
    ///
    /// # 返回
    /// - Err(EmptyVocabulary): 车型词表尚未初始化
    fn all_vehicle_names(&mut self) -> ResolutionResult<Vec<String>>;

    // ===== 复合键 =====
    fn record_study_direction_id(&mut self, key: StudyDirectionKey, id: i64);
    fn get_study_direction_id(&self, key: &StudyDirectionKey) -> ResolutionResult<i64>;

    fn record_direction_movement_id(&mut self, key: DirectionMovementKey, id: i64);
    fn get_direction_movement_id(&self, key: &DirectionMovementKey) -> ResolutionResult<i64>;

    fn record_movement_vehicle_id(&mut self, key: MovementVehicleKey, id: i64);
    fn get_movement_vehicle_id(&self, key: &MovementVehicleKey) -> ResolutionResult<i64>;

    // ===== 文件级备忘 =====
    /// 记录文件中出现的方向（即使为空也会登记该文件）
    fn record_path_directions(&mut self, path: &str, directions: &[String]);
    fn path_directions(&self, path: &str) -> ResolutionResult<Vec<String>>;

    fn record_path_movements(&mut self, path: &str, movements: &[String]);
    fn path_movements(&self, path: &str) -> ResolutionResult<Vec<String>>;

    /// StudyDirection: 已存在则复用，否则调用 create 建行
    ///
    /// # 参数
    /// - create: (miovision_id, direction_type_id) → 新行 id
    fn lookup_or_create_study_direction(
        &mut self,
        key: &StudyDirectionKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved>;

    /// DirectionMovement: 已存在则复用，否则调用 create 建行
    ///
    /// # 参数
    /// - create: (study_direction_id, movement_type_id) → 新行 id
    ///
    /// # 返回
    /// - Err(KeyNotFound): 父级 StudyDirection 尚未解析
    fn lookup_or_create_direction_movement(
        &mut self,
        key: &DirectionMovementKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved>;

    /// MovementVehicle: 已存在则复用，否则调用 create 建行
    ///
    /// # 参数
    /// - create: (direction_movement_id, vehicle_type_id) → 新行 id
    ///
    /// # 返回
    /// - Err(KeyNotFound): 父级 DirectionMovement 尚未解析
    fn lookup_or_create_movement_vehicle(
        &mut self,
        key: &MovementVehicleKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved>;
}

// ==========================================
// TransactionContext
// ==========================================
pub struct TransactionContext<'w> {
    reader: &'w dyn RelationalWriter,
    direction_types: HashMap<String, i64>,
    movement_types: HashMap<String, i64>,
    vehicle_types: HashMap<String, i64>,
    vehicle_names: Option<Vec<String>>,
    study_directions: HashMap<StudyDirectionKey, i64>,
    direction_movements: HashMap<DirectionMovementKey, i64>,
    movement_vehicles: HashMap<MovementVehicleKey, i64>,
    path_directions: HashMap<String, Vec<String>>,
    path_movements: HashMap<String, Vec<String>>,
}

impl<'w> TransactionContext<'w> {
    /// # 参数
    /// - reader: 词表查询使用的数据库门面
    pub fn new(reader: &'w dyn RelationalWriter) -> Self {
        Self {
            reader,
            direction_types: HashMap::new(),
            movement_types: HashMap::new(),
            vehicle_types: HashMap::new(),
            vehicle_names: None,
            study_directions: HashMap::new(),
            direction_movements: HashMap::new(),
            movement_vehicles: HashMap::new(),
            path_directions: HashMap::new(),
            path_movements: HashMap::new(),
        }
    }

    fn vocabulary_id(
        reader: &dyn RelationalWriter,
        cache: &mut HashMap<String, i64>,
        vocabulary: &VocabularyTable,
        name: &str,
    ) -> ResolutionResult<i64> {
        if let Some(id) = cache.get(name) {
            return Ok(*id);
        }

        let ids = reader.select_ids(
            vocabulary.table,
            &[vocabulary.label],
            &[Value::Text(name.to_string())],
        )?;
        match ids.as_slice() {
            [id] => {
                debug!(table = vocabulary.table, name = %name, id = *id, "词表 id 已缓存");
                cache.insert(name.to_string(), *id);
                Ok(*id)
            }
            _ => Err(ResolutionError::NonSingularResult {
                table: vocabulary.table.to_string(),
                name: name.to_string(),
                count: ids.len(),
            }),
        }
    }

    /// 本次运行已建立的 MovementVehicle 数量
    pub fn movement_vehicle_count(&self) -> usize {
        self.movement_vehicles.len()
    }
}

fn lookup<K: Eq + Hash + Debug>(
    map: &HashMap<K, i64>,
    mapping: &'static str,
    key: &K,
) -> ResolutionResult<i64> {
    map.get(key).copied().ok_or_else(|| ResolutionError::KeyNotFound {
        mapping,
        key: format!("{:?}", key),
    })
}

/// 复合键解析：数据库中已有行则登记并复用，否则建行并登记
///
/// # 返回
/// - Err(NonSingularResult): 同一自然键在库中有多行
fn resolve_composite<K: Eq + Hash + Clone + Debug>(
    reader: &dyn RelationalWriter,
    cache: &mut HashMap<K, i64>,
    key: &K,
    table: &'static str,
    columns: [&str; 2],
    parent_ids: (i64, i64),
    create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
) -> ResolutionResult<Resolved> {
    let (first, second) = parent_ids;
    let ids = reader.select_ids(table, &columns, &[Value::Integer(first), Value::Integer(second)])?;
    let resolved = match ids.as_slice() {
        [] => Resolved::Created(create(first, second)?),
        [id] => {
            debug!(table, key = ?key, id = *id, "复合键已在库中，复用已有 id");
            Resolved::Found(*id)
        }
        _ => {
            return Err(ResolutionError::NonSingularResult {
                table: table.to_string(),
                name: format!("{:?}", key),
                count: ids.len(),
            })
        }
    };
    cache.insert(key.clone(), resolved.id());
    Ok(resolved)
}

fn remember(memo: &mut HashMap<String, Vec<String>>, path: &str, names: &[String]) {
    let entry = memo.entry(path.to_string()).or_default();
    for name in names {
        if !entry.contains(name) {
            entry.push(name.clone());
        }
    }
}

fn recall(
    memo: &HashMap<String, Vec<String>>,
    mapping: &'static str,
    path: &str,
) -> ResolutionResult<Vec<String>> {
    memo.get(path).cloned().ok_or_else(|| ResolutionError::KeyNotFound {
        mapping,
        key: path.to_string(),
    })
}

impl<'w> IdentityResolver for TransactionContext<'w> {
    fn direction_type_id(&mut self, name: &str) -> ResolutionResult<i64> {
        Self::vocabulary_id(self.reader, &mut self.direction_types, &DIRECTION_VOCABULARY, name)
    }

    fn movement_type_id(&mut self, name: &str) -> ResolutionResult<i64> {
        Self::vocabulary_id(self.reader, &mut self.movement_types, &MOVEMENT_VOCABULARY, name)
    }

    fn vehicle_type_id(&mut self, name: &str) -> ResolutionResult<i64> {
        Self::vocabulary_id(self.reader, &mut self.vehicle_types, &VEHICLE_VOCABULARY, name)
    }

    fn all_vehicle_names(&mut self) -> ResolutionResult<Vec<String>> {
        if let Some(names) = &self.vehicle_names {
            return Ok(names.clone());
        }

        let mut names = self
            .reader
            .select_text_column(VEHICLE_VOCABULARY.table, VEHICLE_VOCABULARY.label)?;
        if names.is_empty() {
            return Err(ResolutionError::EmptyVocabulary {
                table: VEHICLE_VOCABULARY.table.to_string(),
            });
        }
        names.sort();
        names.dedup();

        self.vehicle_names = Some(names.clone());
        Ok(names)
    }

    fn record_study_direction_id(&mut self, key: StudyDirectionKey, id: i64) {
        self.study_directions.insert(key, id);
    }

    fn get_study_direction_id(&self, key: &StudyDirectionKey) -> ResolutionResult<i64> {
        lookup(&self.study_directions, "study_directions", key)
    }

    fn record_direction_movement_id(&mut self, key: DirectionMovementKey, id: i64) {
        self.direction_movements.insert(key, id);
    }

    fn get_direction_movement_id(&self, key: &DirectionMovementKey) -> ResolutionResult<i64> {
        lookup(&self.direction_movements, "direction_movements", key)
    }

    fn record_movement_vehicle_id(&mut self, key: MovementVehicleKey, id: i64) {
        self.movement_vehicles.insert(key, id);
    }

    fn get_movement_vehicle_id(&self, key: &MovementVehicleKey) -> ResolutionResult<i64> {
        lookup(&self.movement_vehicles, "movement_vehicles", key)
    }

    fn record_path_directions(&mut self, path: &str, directions: &[String]) {
        remember(&mut self.path_directions, path, directions);
    }

    fn path_directions(&self, path: &str) -> ResolutionResult<Vec<String>> {
        recall(&self.path_directions, "path_directions", path)
    }

    fn record_path_movements(&mut self, path: &str, movements: &[String]) {
        remember(&mut self.path_movements, path, movements);
    }

    fn path_movements(&self, path: &str) -> ResolutionResult<Vec<String>> {
        recall(&self.path_movements, "path_movements", path)
    }

    fn lookup_or_create_study_direction(
        &mut self,
        key: &StudyDirectionKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved> {
        if let Some(id) = self.study_directions.get(key) {
            return Ok(Resolved::Found(*id));
        }

        let direction_type_id = self.direction_type_id(&key.direction_name)?;
        resolve_composite(
            self.reader,
            &mut self.study_directions,
            key,
            table_names::STUDIES_DIRECTIONS,
            [sd::MIOVISION_ID, sd::DIRECTION_TYPE_ID],
            (key.miovision_id, direction_type_id),
            create,
        )
    }

    fn lookup_or_create_direction_movement(
        &mut self,
        key: &DirectionMovementKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved> {
        if let Some(id) = self.direction_movements.get(key) {
            return Ok(Resolved::Found(*id));
        }

        let study_direction_id = self.get_study_direction_id(&key.study_direction())?;
        let movement_type_id = self.movement_type_id(&key.movement_name)?;
        resolve_composite(
            self.reader,
            &mut self.direction_movements,
            key,
            table_names::DIRECTIONS_MOVEMENTS,
            [dm::STUDY_DIRECTION_ID, dm::MOVEMENT_TYPE_ID],
            (study_direction_id, movement_type_id),
            create,
        )
    }

    fn lookup_or_create_movement_vehicle(
        &mut self,
        key: &MovementVehicleKey,
        create: &mut dyn FnMut(i64, i64) -> ResolutionResult<i64>,
    ) -> ResolutionResult<Resolved> {
        if let Some(id) = self.movement_vehicles.get(key) {
            return Ok(Resolved::Found(*id));
        }

        let direction_movement_id = self.get_direction_movement_id(&key.direction_movement())?;
        let vehicle_type_id = self.vehicle_type_id(&key.vehicle_name)?;
        resolve_composite(
            self.reader,
            &mut self.movement_vehicles,
            key,
            table_names::MOVEMENTS_VEHICLES,
            [mv::DIRECTION_MOVEMENT_ID, mv::VEHICLE_TYPE_ID],
            (direction_movement_id, vehicle_type_id),
            create,
        )
    }
}
