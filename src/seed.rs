//! Deterministic demo dataset.
//!
//! `tnm init --seed` loads one region-south pharmacy chain: a handful of
//! stores, the store-001 team under Carlos Silva, and each employee's
//! opening task sheet. Everything is derived from fixed tables and the
//! single `now` the caller passes in, so two seeds at the same instant are
//! identical and every dashboard number comes from real aggregation.

use chrono::{DateTime, Duration, Utc};

use crate::directory::Directory;
use crate::model::{
    Region, Role, Store, Task, TaskFrequency, TaskPriority, TaskStatus, UserProfile,
};

const GENERATED_STORES: usize = 25;

struct TaskTemplate {
    title: &'static str,
    description: &'static str,
    priority: TaskPriority,
    frequency: TaskFrequency,
    extendable: bool,
    delegable: bool,
    due_in_days: i64,
}

const TASK_TEMPLATES: [TaskTemplate; 5] = [
    TaskTemplate {
        title: "Recebimento de Mercadorias do CD",
        description: "Receber, conferir e armazenar mercadorias vindas do centro de distribuição.",
        priority: TaskPriority::UrgentImportant,
        frequency: TaskFrequency::Diaria,
        extendable: false,
        delegable: true,
        due_in_days: 1,
    },
    TaskTemplate {
        title: "Análise de Estoque (Diária)",
        description: "Realizar análise diária dos níveis de estoque e identificar necessidades de reposição.",
        priority: TaskPriority::UrgentImportant,
        frequency: TaskFrequency::Diaria,
        extendable: false,
        delegable: true,
        due_in_days: 1,
    },
    TaskTemplate {
        title: "Alteração de Preço",
        description: "Atualizar preços de produtos conforme orientações da matriz.",
        priority: TaskPriority::UrgentImportant,
        frequency: TaskFrequency::Diaria,
        extendable: false,
        delegable: true,
        due_in_days: 1,
    },
    TaskTemplate {
        title: "Limpeza de Prateleiras (Infantil)",
        description: "Realizar limpeza completa e organizar prateleiras do setor infantil.",
        priority: TaskPriority::Normal,
        frequency: TaskFrequency::Diaria,
        extendable: true,
        delegable: true,
        due_in_days: 2,
    },
    TaskTemplate {
        title: "Conferência de Vencimentos de Medicamentos Controlados",
        description: "Verificar produtos próximos ao vencimento e separar para devolução.",
        priority: TaskPriority::Important,
        frequency: TaskFrequency::Semanal,
        extendable: true,
        delegable: true,
        due_in_days: 5,
    },
];

/// Which template indexes each store-001 employee starts with.
const TASK_DISTRIBUTION: [(&str, [usize; 3]); 6] = [
    ("2", [0, 2, 4]), // Maria Oliveira
    ("3", [3, 2, 0]), // Pedro Santos
    ("4", [0, 1, 3]), // Ana Costa
    ("5", [3, 2, 4]), // Roberto Alves
    ("6", [2, 3, 1]), // Júlia Pereira
    ("7", [3, 4, 0]), // Marcos Rodrigues
];

pub fn demo_directory() -> Directory {
    Directory::new(demo_users(), demo_stores(), demo_regions())
}

pub fn demo_regions() -> Vec<Region> {
    [
        ("1", "Região Sul"),
        ("2", "Região Sudeste"),
        ("3", "Região Centro-Oeste"),
    ]
    .into_iter()
    .map(|(id, name)| Region {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

pub fn demo_stores() -> Vec<Store> {
    let mut stores: Vec<Store> = [
        ("1", "Filial 001 - Centro", "Curitiba"),
        ("2", "Filial 002 - Rebouças", "Curitiba"),
        ("3", "Filial 003 - Portão", "Curitiba"),
        ("4", "Filial 004 - Batel", "Curitiba"),
        ("5", "Filial 005 - Barreirinha", "Londrina"),
    ]
    .into_iter()
    .map(|(id, name, city)| Store {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        state: Some("PR".to_string()),
        region_id: "1".to_string(),
    })
    .collect();

    let districts = ["Centro", "Norte", "Sul", "Leste", "Oeste"];
    let cities = [
        ("Curitiba", "PR"),
        ("Londrina", "PR"),
        ("Maringá", "PR"),
        ("Florianópolis", "SC"),
        ("Joinville", "SC"),
        ("Campo Grande", "MS"),
        ("Porto Alegre", "RS"),
        ("Caxias do Sul", "RS"),
    ];
    for i in 0..GENERATED_STORES {
        let number = i + 6;
        let (city, state) = cities[i % cities.len()];
        stores.push(Store {
            id: number.to_string(),
            name: format!("Filial {number:03} - {}", districts[i % districts.len()]),
            city: city.to_string(),
            state: Some(state.to_string()),
            region_id: ((i % 3) + 1).to_string(),
        });
    }

    stores
}

pub fn demo_users() -> Vec<UserProfile> {
    let mut users = vec![UserProfile {
        id: "1".to_string(),
        name: "Carlos Silva".to_string(),
        role: Role::Gerente,
        store_id: Some("1".to_string()),
        region_id: None,
        position: None,
    }];

    let staff = [
        ("2", "Maria Oliveira", "Farmacêutica"),
        ("3", "Pedro Santos", "Atendente"),
        ("4", "Ana Costa", "Estoquista"),
        ("5", "Roberto Alves", "Operador de Caixa"),
        ("6", "Júlia Pereira", "Estagiária"),
        ("7", "Marcos Rodrigues", "Vigilante"),
    ];
    for (id, name, position) in staff {
        users.push(UserProfile {
            id: id.to_string(),
            name: name.to_string(),
            role: Role::Colaborador,
            store_id: Some("1".to_string()),
            region_id: None,
            position: Some(position.to_string()),
        });
    }

    users.push(UserProfile {
        id: "8".to_string(),
        name: "Fernando Costa".to_string(),
        role: Role::Supervisor,
        store_id: None,
        region_id: Some("1".to_string()),
        position: None,
    });
    users.push(UserProfile {
        id: "9".to_string(),
        name: "Admin Sistema".to_string(),
        role: Role::MatrizAdm,
        store_id: None,
        region_id: None,
        position: None,
    });

    users
}

pub fn demo_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let all_staff: Vec<String> = (2u32..=7).map(|n| n.to_string()).collect();

    let mut tasks = Vec::new();

    for (employee_id, template_indexes) in TASK_DISTRIBUTION {
        for (n, template_index) in template_indexes.into_iter().enumerate() {
            let template = &TASK_TEMPLATES[template_index];
            tasks.push(Task {
                id: format!("task-{employee_id}-{}", n + 1),
                title: template.title.to_string(),
                description: template.description.to_string(),
                observations: None,
                priority: template.priority,
                frequency: template.frequency,
                store_id: "1".to_string(),
                created_at: now,
                due_date: now + Duration::days(template.due_in_days),
                status: TaskStatus::Pendente,
                delegable: template.delegable,
                extendable: template.extendable,
                owner: "1".to_string(),
                delegates: all_staff.clone(),
                assigned_to: Some(employee_id.to_string()),
                started_by: None,
                started_at: None,
                completed_by: None,
                completed_at: None,
            });
        }
    }

    // The manager keeps two non-delegable duties of his own.
    tasks.push(Task {
        id: "task-gerente-1".to_string(),
        title: "Supervisão Geral da Loja".to_string(),
        description: "Coordenar atividades gerais e monitorar desempenho da equipe.".to_string(),
        observations: None,
        priority: TaskPriority::Important,
        frequency: TaskFrequency::Diaria,
        store_id: "1".to_string(),
        created_at: now,
        due_date: now + Duration::days(1),
        status: TaskStatus::Pendente,
        delegable: false,
        extendable: false,
        owner: "1".to_string(),
        delegates: Vec::new(),
        assigned_to: Some("1".to_string()),
        started_by: None,
        started_at: None,
        completed_by: None,
        completed_at: None,
    });
    tasks.push(Task {
        id: "task-gerente-2".to_string(),
        title: "Reunião de Equipe Semanal".to_string(),
        description: "Conduzir reunião semanal com toda a equipe para alinhamentos.".to_string(),
        observations: None,
        priority: TaskPriority::Important,
        frequency: TaskFrequency::Semanal,
        store_id: "1".to_string(),
        created_at: now,
        due_date: now + Duration::days(3),
        status: TaskStatus::Pendente,
        delegable: false,
        extendable: true,
        owner: "1".to_string(),
        delegates: Vec::new(),
        assigned_to: Some("1".to_string()),
        started_by: None,
        started_at: None,
        completed_by: None,
        completed_at: None,
    });

    tasks
}
